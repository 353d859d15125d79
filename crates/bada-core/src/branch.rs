//! Branch directory.

/// A restaurant branch known to the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub code: &'static str,
    pub name: &'static str,
    pub location: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const BRANCHES: &[Branch] = &[
    Branch {
        code: "BR001",
        name: "BADA Restaurant",
        location: "Al Barsha",
        lat: 25.0857,
        lng: 55.2094,
    },
    Branch {
        code: "BR002",
        name: "Crazy Ramen",
        location: "Al Ghurair",
        lat: 25.2697,
        lng: 55.3273,
    },
    Branch {
        code: "BR003",
        name: "Crazy Ramen",
        location: "Muraqqabat",
        lat: 25.2656,
        lng: 55.3220,
    },
    Branch {
        code: "BR004",
        name: "Crazy Ramen",
        location: "Burjuman",
        lat: 25.2529,
        lng: 55.3021,
    },
];

impl Branch {
    /// All known branches.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        BRANCHES
    }

    /// Find a branch by code.
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static Self> {
        BRANCHES.iter().find(|b| b.code == code)
    }

    /// `"<name> - <location>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let branch = Branch::lookup("BR003").unwrap();
        assert_eq!(branch.location, "Muraqqabat");
        assert!(Branch::lookup("br003").is_none());
    }

    #[test]
    fn test_codes_unique() {
        let mut codes: Vec<_> = Branch::all().iter().map(|b| b.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Branch::all().len());
    }
}
