//! Services the codec needs from its host application.

/// Answers whether a font is available for rendering text objects.
pub trait FontOracle {
    fn is_font_installed(&self, name: &str) -> bool;
}

/// Treats every font as installed, so no missing-font diagnostics are produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeInstalled;

impl FontOracle for AssumeInstalled {
    fn is_font_installed(&self, _name: &str) -> bool {
        true
    }
}

/// A fixed list of installed fonts, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InstalledFonts {
    names: Vec<String>,
}

impl InstalledFonts {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        InstalledFonts {
            names: names.into_iter().map(|n| n.as_ref().to_lowercase()).collect(),
        }
    }
}

impl FontOracle for InstalledFonts {
    fn is_font_installed(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names.iter().any(|n| *n == name)
    }
}

/// Maps template file names stored in the file to paths usable by the host.
pub trait PathResolver {
    fn resolve(&self, stored: &str) -> String;
}

/// Returns stored names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl PathResolver for IdentityResolver {
    fn resolve(&self, stored: &str) -> String {
        stored.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_fonts_ignore_case() {
        let fonts = InstalledFonts::new(["Arial", "Times New Roman"]);
        assert!(fonts.is_font_installed("arial"));
        assert!(!fonts.is_font_installed("Helvetica"));
        assert!(AssumeInstalled.is_font_installed("Anything"));
    }
}
