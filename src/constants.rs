//! Application-wide constants
//!
//! Constants are grouped by their purpose. Role, status and setting keys
//! live in submodules so call sites read as `roles::ADMIN` or
//! `car_status::IN_REPAIR`.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3001;

/// Default frontend base URL used in e-mail links
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Default directory for uploaded files
pub const DEFAULT_UPLOADS_PATH: &str = "./uploads";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Name of the cookie carrying the access token
pub const AUTH_COOKIE_NAME: &str = "jwt";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Invitation links stay valid this long
pub const INVITATION_EXPIRY_HOURS: i64 = 24;

/// Password reset links stay valid this long
pub const PASSWORD_RESET_EXPIRY_HOURS: i64 = 1;

/// Random bytes in invitation and reset tokens (hex encoded, so twice as many chars)
pub const ONE_TIME_TOKEN_BYTES: usize = 32;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const USER: &str = "user";
    pub const LEADER: &str = "leader";
    pub const ADMIN: &str = "admin";
    pub const OWNER: &str = "owner";

    /// All user roles
    pub const ALL: &[&str] = &[USER, LEADER, ADMIN, OWNER];
}

// =============================================================================
// FLEET
// =============================================================================

/// Car availability
pub mod car_status {
    pub const AVAILABLE: &str = "available";
    pub const IN_USE: &str = "in_use";
    pub const IN_REPAIR: &str = "in_repair";
    pub const OUT_OF_SERVICE: &str = "out_of_service";

    pub const ALL: &[&str] = &[AVAILABLE, IN_USE, IN_REPAIR, OUT_OF_SERVICE];
}

/// Which company a car belongs to. Drives the revenue rate of work entries.
pub mod car_owner {
    pub const PARENT_COMPANY: &str = "parent_company";
    pub const OWN_COMPANY: &str = "own_company";

    pub const ALL: &[&str] = &[PARENT_COMPANY, OWN_COMPANY];
}

// =============================================================================
// COMPLAINTS
// =============================================================================

/// Complaint workflow statuses
pub mod complaint_status {
    pub const EMPTY: &str = "empty";
    pub const IN_PROGRESS: &str = "in_progress";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
    pub const RESOLVED: &str = "resolved";

    pub const ALL: &[&str] = &[EMPTY, IN_PROGRESS, ACCEPTED, REJECTED, RESOLVED];
}

/// Columns complaints may be sorted by
pub const COMPLAINT_SORT_COLUMNS: &[&str] = &[
    "id",
    "complaint_number",
    "client",
    "problem_type",
    "compensation_value",
    "courier",
    "address",
    "delivery_date",
    "status",
    "created_at",
];

/// Default complaint sort column
pub const DEFAULT_COMPLAINT_SORT: &str = "delivery_date";

// =============================================================================
// SETTINGS
// =============================================================================

/// Setting keys
pub mod settings {
    pub const COMPANY_RATE_PER_STOP: &str = "company_rate_per_stop";
    pub const COMPANY_CAR_RATE: &str = "company_car_rate";
    pub const PARENT_COMPANY_DISPLAY_NAME: &str = "parent_company_display_name";
    pub const OWN_COMPANY_DISPLAY_NAME: &str = "own_company_display_name";

    /// Keys whose value must be a non-negative number
    pub const NUMERIC: &[&str] = &[COMPANY_RATE_PER_STOP, COMPANY_CAR_RATE];

    /// Seeded values: (key, value, description)
    pub const DEFAULTS: &[(&str, &str, &str)] = &[
        (
            COMPANY_RATE_PER_STOP,
            "3.5",
            "Revenue per stop when driving a parent company car",
        ),
        (
            COMPANY_CAR_RATE,
            "6.0",
            "Revenue per stop when driving an own company car",
        ),
        (
            PARENT_COMPANY_DISPLAY_NAME,
            "Parent Company",
            "Display name of the parent company",
        ),
        (
            OWN_COMPANY_DISPLAY_NAME,
            "Own Company",
            "Display name of the own company",
        ),
    ];
}

// =============================================================================
// FILES
// =============================================================================

/// Stored file categories
pub mod file_types {
    pub const IMAGE: &str = "image";
    pub const PDF: &str = "pdf";
}

/// Maximum accepted image upload (5 MiB)
/// Largest amount, in cents, that fits a NUMERIC(10, 2) money column
pub const MAX_MONEY_CENTS: i64 = 9_999_999_999;

pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum accepted PDF upload (10 MiB)
pub const MAX_PDF_SIZE: usize = 10 * 1024 * 1024;

/// Processed images fit inside this box
pub const IMAGE_MAX_WIDTH: u32 = 1920;
pub const IMAGE_MAX_HEIGHT: u32 = 1080;

/// JPEG quality used when re-encoding uploads
pub const IMAGE_JPEG_QUALITY: u8 = 80;

/// Request body limit for all routes (PDF limit plus multipart overhead)
pub const MAX_REQUEST_BODY_SIZE: usize = MAX_PDF_SIZE + 1024 * 1024;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 10;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Upload endpoint - max requests
    pub const FILES_MAX_REQUESTS: i64 = 20;
    /// Upload endpoint - window in seconds
    pub const FILES_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 300;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for complaints
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;
