use std::str::FromStr;

use coursely_core::AppError;
use serde::{Deserialize, Serialize};

/// Platform role stored on a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Default role for every newly synced profile.
    #[default]
    Learner,
    /// May author and manage their own courses.
    Instructor,
    /// Platform moderator with every capability.
    Admin,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learner => "learner",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }

    /// Returns whether this role grants the capability.
    #[must_use]
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewDashboard
            | Capability::EnrollInCourses
            | Capability::ViewCertificates => true,
            Capability::AuthorCourses => matches!(self, Self::Instructor | Self::Admin),
            Capability::ModerateCourses
            | Capability::ViewPlatformStats
            | Capability::ManageRoles => matches!(self, Self::Admin),
        }
    }

    /// Returns every capability granted by this role, in declaration order.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|capability| self.grants(*capability))
            .collect()
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "learner" => Ok(Self::Learner),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Privileged operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Learner dashboard with enrollments and progress.
    ViewDashboard,
    /// Enrolling in a published course.
    EnrollInCourses,
    /// Listing earned certificates.
    ViewCertificates,
    /// Instructor dashboard and course creation.
    AuthorCourses,
    /// Approving or rejecting submitted courses.
    ModerateCourses,
    /// Platform-wide counters on the admin panel.
    ViewPlatformStats,
    /// Changing the role of another profile.
    ManageRoles,
}

impl Capability {
    /// Returns a stable transport value for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::EnrollInCourses => "enroll_in_courses",
            Self::ViewCertificates => "view_certificates",
            Self::AuthorCourses => "author_courses",
            Self::ModerateCourses => "moderate_courses",
            Self::ViewPlatformStats => "view_platform_stats",
            Self::ManageRoles => "manage_roles",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::ViewDashboard,
            Capability::EnrollInCourses,
            Capability::ViewCertificates,
            Capability::AuthorCourses,
            Capability::ModerateCourses,
            Capability::ViewPlatformStats,
            Capability::ManageRoles,
        ];

        ALL
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown capability value '{value}'")))
    }
}
