//! Host platform, resolved once and passed down explicitly

/// Platform family that decides which copy strategies are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Device/inode pairs are reliable enough to track hardlink groups.
    pub fn has_stable_inodes(&self) -> bool {
        matches!(self, Self::Posix)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_matches_target() {
        assert_eq!(Platform::host() == Platform::Windows, cfg!(windows));
        assert_eq!(Platform::default(), Platform::host());
    }
}
