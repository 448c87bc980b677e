/// Fractional digits kept for every monetary amount (DECIMAL(10,2)).
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount representable in a DECIMAL(10,2) column.
pub const MAX_AMOUNT: &str = "99999999.99";

/// Maximum length of a treatment title
pub const TREATMENT_TITLE_MAX_LEN: usize = 200;

/// Maximum length of a donation receipt URL
pub const RECEIPT_URL_MAX_LEN: usize = 255;

/// Display name used in transparency reports when the donor has no profile.
pub const ANONYMOUS_DONOR_NAME: &str = "Anonymous Donor";

/// Default number of attempts for a donation write when storage is busy.
pub const DEFAULT_DONATION_MAX_ATTEMPTS: u32 = 3;

/// Base delay between donation write attempts, multiplied by the attempt number.
pub const DONATION_RETRY_BACKOFF_MS: u64 = 50;

pub const USER_NAME_MAX_LEN: usize = 100;
pub const USER_EMAIL_MAX_LEN: usize = 100;
pub const USER_PHONE_MAX_LEN: usize = 20;

pub const MEDICATION_NAME_MAX_LEN: usize = 100;

/// Largest stock a single listing may declare.
pub const MEDICATION_MAX_QUANTITY: i32 = 100_000;

pub const DELIVERY_ADDRESS_MAX_LEN: usize = 500;

pub const ALERT_TITLE_MAX_LEN: usize = 200;
pub const ALERT_REGION_MAX_LEN: usize = 100;

pub const CHAT_TOPIC_MAX_LEN: usize = 100;
pub const CHAT_MESSAGE_MAX_LEN: usize = 5000;

pub const MISSION_TITLE_MAX_LEN: usize = 200;
pub const MISSION_LOCATION_MAX_LEN: usize = 100;
pub const MISSION_NOTES_MAX_LEN: usize = 1000;

/// Maximum number of specialties listed on one mission
pub const MISSION_SPECIALTIES_MAX: usize = 20;
pub const MISSION_SPECIALTY_MAX_LEN: usize = 100;
