//! Module names as they appear in the sidebar descriptors returned by the
//! backend.

pub const DASHBOARD: &str = "dashboard";
pub const USERS: &str = "users";
pub const CLASSES: &str = "classes";
pub const TEACHERS: &str = "teachers";
pub const STUDENTS: &str = "students";
pub const FEES: &str = "fees";
pub const REPORTS: &str = "reports";
pub const SETTINGS: &str = "settings";
