//! Step names recorded in the workflow journal.

pub const STEP_SIGN_IN: &str = "sign_in";
pub const STEP_CREATE_ACCOUNT: &str = "create_account";
pub const STEP_WRITE_USER_RECORD: &str = "write_user_record";
pub const STEP_REQUEST_OTP: &str = "request_otp";
pub const STEP_NAVIGATE: &str = "navigate";

pub const STEP_LOAD_USER: &str = "load_user";
pub const STEP_RESEND_OTP: &str = "resend_otp";
pub const STEP_FORCE_SIGN_OUT: &str = "force_sign_out";
pub const STEP_CREATE_USER_RECORD: &str = "create_user_record";
pub const STEP_SET_SESSION: &str = "set_session";

pub const STEP_SIGN_OUT: &str = "sign_out";
pub const STEP_CLEAR_STATE: &str = "clear_state";

pub const STEP_PASSWORD_RESET: &str = "password_reset";

pub const STEP_VALIDATE_OTP: &str = "validate_otp";
pub const STEP_VERIFY_OTP: &str = "verify_otp";
pub const STEP_FIND_USER: &str = "find_user";
pub const STEP_MARK_VERIFIED: &str = "mark_verified";
pub const STEP_SEND_OTP: &str = "send_otp";

pub const STEP_BUILD_ORDER: &str = "build_order";
pub const STEP_CREATE_ORDER: &str = "create_order";

pub const STEP_SET_PERSISTENCE: &str = "set_persistence";
