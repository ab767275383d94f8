//! Permission code constants for the schooldesk client.
//!
//! The backend grants permissions as opaque `area.action` strings. These
//! constants name the ones the client gates on so that route tables and
//! fragment gates never spell them by hand.
//!
//! # Example
//!
//! ```ignore
//! use schooldesk_core::permissions;
//!
//! if store.has_any_permission(&[permissions::FEES_VIEW, permissions::FEES_RECORD_PAYMENT]) {
//!     // Show the fees summary card
//! }
//! ```

// =============================================================================
// Users permissions
// =============================================================================

/// Permission to list users
pub const USERS_VIEW: &str = "users.view";
/// Permission to create users
pub const USERS_CREATE: &str = "users.create";
/// Permission to update users
pub const USERS_UPDATE: &str = "users.update";
/// Permission to deactivate users
pub const USERS_DEACTIVATE: &str = "users.deactivate";

// =============================================================================
// Classes permissions
// =============================================================================

/// Permission to list classes
pub const CLASSES_VIEW: &str = "classes.view";
/// Permission to create, rename and archive classes
pub const CLASSES_MANAGE: &str = "classes.manage";
/// Permission to assign a class teacher
pub const CLASSES_ASSIGN_TEACHER: &str = "classes.assign_teacher";

// =============================================================================
// Teachers permissions
// =============================================================================

/// Permission to list teachers
pub const TEACHERS_VIEW: &str = "teachers.view";
/// Permission to create and update teachers
pub const TEACHERS_MANAGE: &str = "teachers.manage";

// =============================================================================
// Students permissions
// =============================================================================

/// Permission to list students
pub const STUDENTS_VIEW: &str = "students.view";
/// Permission to record marks and attendance
pub const STUDENTS_RECORD_MARKS: &str = "students.record_marks";

// =============================================================================
// Fees permissions
// =============================================================================

/// Permission to view fee balances
pub const FEES_VIEW: &str = "fees.view";
/// Permission to record a fee payment
pub const FEES_RECORD_PAYMENT: &str = "fees.record_payment";

// =============================================================================
// Reports permissions
// =============================================================================

/// Permission to view reports
pub const REPORTS_VIEW: &str = "reports.view";
/// Permission to trigger PDF report generation
pub const REPORTS_GENERATE: &str = "reports.generate";

// =============================================================================
// Settings permissions
// =============================================================================

/// Permission to change school settings
pub const SETTINGS_MANAGE: &str = "settings.manage";
/// Permission to edit role permission grants
pub const PERMISSIONS_MANAGE: &str = "permissions.manage";
