pub mod dispatch;
pub mod helpers;
pub mod update_value;
