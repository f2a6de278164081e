pub mod agents;
pub mod home;
pub mod knowledge;
pub mod question_detail;
pub mod settings;
pub mod storage;
