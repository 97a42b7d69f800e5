/// Uppercase Latin letters, always part of the character set.
pub const UPPER_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Lowercase Latin letters, always part of the character set.
pub const LOWER_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Decimal digits, appended when numbers are enabled.
pub const NUMBER_CHARS: &str = "0123456789";

/// Special symbols (24), appended when special characters are enabled.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";
