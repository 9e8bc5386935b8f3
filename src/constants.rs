//! Application-wide constants
//!
//! Default values applied during configuration resolution, plus the keys and
//! paths shared with the host environment.

/// Layout defaults
pub mod layout {
    /// Font size in pixels when the host does not supply one
    pub const FONT_SIZE: f32 = 18.0;

    /// Editor width in pixels
    pub const WIDTH: f32 = 600.0;

    /// Horizontal margin in pixels
    pub const MARGIN_HORIZONTAL: f32 = 30.0;

    /// Vertical margin in pixels
    pub const MARGIN_VERTICAL: f32 = 35.0;
}

/// Bundled glyph-outline font family (Open Sans, Latin subset)
pub mod fonts {
    pub const LOCAL_FONT_PATH: &str = "/fonts/";
    pub const REGULAR: &str = "OpenSans-Regular-Latin.ttf";
    pub const BOLD: &str = "OpenSans-Bold-Latin.ttf";
    pub const BOLD_ITALIC: &str = "OpenSans-BoldItalic-Latin.ttf";
    pub const ITALIC: &str = "OpenSans-Italic-Latin.ttf";

    /// Google Fonts family spec activated alongside the outline fonts
    pub const WEB_FONT_FAMILY: &str = "Open Sans:400italic,700italic,700,400";
}

/// Skin selection
pub mod skin {
    /// Skin name that triggers loading of the bundled stylesheet
    pub const DEFAULT: &str = "default";
}

/// Local user identity
pub mod user {
    /// Host storage key holding the generated user id
    pub const LOCAL_USER_KEY: &str = "localuser";

    /// Leading letter of generated user ids
    pub const ID_PREFIX: char = 'A';

    /// Exclusive upper bound of the random part (rendered as hex, at most 4 digits)
    pub const ID_RANGE: u32 = 10_000;
}

/// Host storage location
pub mod storage {
    pub const APP_DIR: &str = "ritzy";
    pub const FILENAME: &str = "local-storage.json";
}

/// Rendering environment
pub mod environment {
    /// Smallest font size most rasterizers render legibly
    pub const MIN_FONT_SIZE: f32 = 6.0;
}
