pub mod tokens {

    /// Length of generated bearer secrets.
    pub const SECRET_LENGTH: usize = 12;
}

pub mod backup {

    /// Format tag embedded in the backup envelope.
    pub const FORMAT: &str = "gatekey-tokens";

    /// Current envelope version.
    pub const VERSION: u32 = 1;

    /// zstd compression level for exports.
    pub const COMPRESSION_LEVEL: i32 = 9;
}

pub mod enrollment {

    /// Role assigned when a token enrolls a user into a course.
    pub const DEFAULT_ROLE: &str = "student";
}
