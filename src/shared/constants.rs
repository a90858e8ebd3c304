// =============================================================================
// ACCOUNT CONSTANTS
// =============================================================================

/// Role assigned to every self-registered account
pub const ROLE_DRIVER: &str = "driver";

/// Minimum length of a new password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Vehicle categories a driver may declare capability for
pub const VEHICLE_CATEGORIES: [&str; 6] = ["sedan", "suv", "minibus", "van", "truck", "bus"];

// =============================================================================
// BUNDLED ASSETS
// =============================================================================

/// Avatar shown until the driver uploads their own
pub const DEFAULT_AVATAR_PATH: &str = "/assets/user-avatar.png";

/// License image shown until the driver uploads their own
pub const SAMPLE_LICENSE_PATH: &str = "/assets/licence-sample.jpg";

/// Any stored path containing this marker is a bundled sample and is never deleted
pub const SAMPLE_ASSET_MARKER: &str = "licence-sample";

// =============================================================================
// DISPLAY CONSTANTS
// =============================================================================

/// Currency symbol used for every money label
pub const CURRENCY_SYMBOL: &str = "₱";

/// Number of rows in the dashboard's recent bookings table
pub const RECENT_BOOKINGS_LIMIT: usize = 10;

/// Complaint descriptions longer than this are cut in list views
pub const COMPLAINT_PREVIEW_CHARS: usize = 40;
