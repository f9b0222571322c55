//! # User context
//!
//! The requester attributes the ABAC rules evaluate against. The context
//! is owned by the external identity store; the engine receives it as an
//! immutable input per call and never persists it.

use serde::{Deserialize, Serialize};

use emr_rbac::Role;

/// Hospital branch.
///
/// Wire names are the upstream branch codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Hanoi branch (`CN_HN`).
    #[serde(rename = "CN_HN")]
    Hanoi,

    /// Ho Chi Minh City branch (`CN_HCM`).
    #[serde(rename = "CN_HCM")]
    HoChiMinh,
}

impl Branch {
    /// Get the wire-name of the branch.
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Hanoi => "CN_HN",
            Branch::HoChiMinh => "CN_HCM",
        }
    }

    /// Parse a branch from its wire-name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CN_HN" => Some(Branch::Hanoi),
            "CN_HCM" => Some(Branch::HoChiMinh),
            _ => None,
        }
    }
}

/// Hospital department.
///
/// Wire names keep the upstream service's Vietnamese department codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Department {
    /// Internal medicine (`Khoa_Noi`).
    #[serde(rename = "Khoa_Noi")]
    InternalMedicine,

    /// Surgery (`Khoa_Ngoai`).
    #[serde(rename = "Khoa_Ngoai")]
    Surgery,

    /// Reception (`Phong_TiepDon`).
    #[serde(rename = "Phong_TiepDon")]
    Reception,

    /// Finance (`Phong_TaiChinh`).
    #[serde(rename = "Phong_TaiChinh")]
    Finance,

    /// Human resources (`Phong_NhanSu`).
    #[serde(rename = "Phong_NhanSu")]
    HumanResources,

    /// IT department.
    #[serde(rename = "IT")]
    It,

    /// Security department.
    Security,
}

impl Department {
    /// Get the wire-name of the department.
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::InternalMedicine => "Khoa_Noi",
            Department::Surgery => "Khoa_Ngoai",
            Department::Reception => "Phong_TiepDon",
            Department::Finance => "Phong_TaiChinh",
            Department::HumanResources => "Phong_NhanSu",
            Department::It => "IT",
            Department::Security => "Security",
        }
    }

    /// Parse a department from its wire-name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Khoa_Noi" => Some(Department::InternalMedicine),
            "Khoa_Ngoai" => Some(Department::Surgery),
            "Phong_TiepDon" => Some(Department::Reception),
            "Phong_TaiChinh" => Some(Department::Finance),
            "Phong_NhanSu" => Some(Department::HumanResources),
            "IT" => Some(Department::It),
            "Security" => Some(Department::Security),
            _ => None,
        }
    }
}

/// Staff seniority level, ordered from most junior to most senior.
///
/// # Examples
///
/// ```
/// use emr_authz::Seniority;
///
/// assert!(Seniority::Head > Seniority::Junior);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seniority {
    /// Intern staff.
    Intern = 0,

    /// Junior staff.
    Junior = 1,

    /// Mid-level staff.
    Mid = 2,

    /// Senior staff.
    Senior = 3,

    /// Team lead.
    Lead = 4,

    /// Department head.
    Head = 5,
}

impl Seniority {
    /// Get the string representation of the seniority level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Intern => "Intern",
            Seniority::Junior => "Junior",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
            Seniority::Lead => "Lead",
            Seniority::Head => "Head",
        }
    }

    /// Parse a seniority level from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "intern" => Some(Seniority::Intern),
            "junior" => Some(Seniority::Junior),
            "mid" => Some(Seniority::Mid),
            "senior" => Some(Seniority::Senior),
            "lead" => Some(Seniority::Lead),
            "head" => Some(Seniority::Head),
            _ => None,
        }
    }
}

/// The requester attributes used for one authorization decision.
///
/// # Examples
///
/// ```
/// use emr_authz::{Branch, Department, Seniority, UserContext};
/// use emr_rbac::Role;
///
/// let user = UserContext::new(
///     "U0003",
///     Role::Nurse,
///     Branch::Hanoi,
///     Department::InternalMedicine,
///     Seniority::Junior,
/// );
/// assert_eq!(user.role, Role::Nurse);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// User identifier from the identity store.
    pub user_id: String,

    /// Staff role.
    pub role: Role,

    /// Hospital branch.
    pub branch: Branch,

    /// Department.
    pub department: Department,

    /// Seniority level.
    pub seniority: Seniority,
}

impl UserContext {
    /// Create a new user context.
    ///
    /// # Arguments
    ///
    /// * `user_id` - User identifier
    /// * `role` - Staff role
    /// * `branch` - Hospital branch
    /// * `department` - Department
    /// * `seniority` - Seniority level
    pub fn new(
        user_id: impl Into<String>,
        role: Role,
        branch: Branch,
        department: Department,
        seniority: Seniority,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            branch,
            department,
            seniority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_wire_names() {
        assert_eq!(Branch::Hanoi.as_str(), "CN_HN");
        assert_eq!(Branch::parse("CN_HCM"), Some(Branch::HoChiMinh));
        assert_eq!(Branch::parse("CN_DN"), None);

        let json = serde_json::to_string(&Branch::Hanoi).unwrap();
        assert_eq!(json, "\"CN_HN\"");
    }

    #[test]
    fn test_department_wire_names() {
        assert_eq!(Department::HumanResources.as_str(), "Phong_NhanSu");
        assert_eq!(Department::parse("Khoa_Noi"), Some(Department::InternalMedicine));
        assert_eq!(Department::parse("Khoa_Gi"), None);

        let json = serde_json::to_string(&Department::Reception).unwrap();
        assert_eq!(json, "\"Phong_TiepDon\"");
    }

    #[test]
    fn test_seniority_ordering() {
        assert!(Seniority::Intern < Seniority::Junior);
        assert!(Seniority::Junior < Seniority::Mid);
        assert!(Seniority::Senior < Seniority::Lead);
        assert!(Seniority::Lead < Seniority::Head);
    }

    #[test]
    fn test_user_context_round_trip() {
        let user = UserContext::new(
            "U0001",
            Role::Doctor,
            Branch::HoChiMinh,
            Department::Surgery,
            Seniority::Senior,
        );

        let json = serde_json::to_string(&user).unwrap();
        let back: UserContext = serde_json::from_str(&json).unwrap();
        assert_eq!(user, back);
        assert!(json.contains("\"userId\":\"U0001\""));
        assert!(json.contains("\"Khoa_Ngoai\""));
    }
}
