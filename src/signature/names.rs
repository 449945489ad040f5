use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseDomainError;

impl Display for ParseDomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse domain name")
    }
}

impl Error for ParseDomainError {}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParseSelectorError;

impl Display for ParseSelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse selector")
    }
}

impl Error for ParseSelectorError {}

// Names compare and hash ASCII-case-insensitively, and print as given.
macro_rules! impl_name_traits {
    ($name:ident) => {
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.eq_ignore_ascii_case(&other.0)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                for b in self.0.bytes() {
                    state.write_u8(b.to_ascii_lowercase());
                }
            }
        }
    };
}

/// A domain name, as used in the *d=* tag and in the domain part of the *i=*
/// tag.
///
/// Internationalized names may be given in U-label or A-label form.
#[derive(Clone)]
pub struct DomainName(Box<str>);

impl_name_traits!(DomainName);

impl DomainName {
    pub fn new(s: &str) -> Result<Self, ParseDomainError> {
        if is_domain_name(s) && idna::domain_to_ascii(s).is_ok() {
            Ok(Self(s.into()))
        } else {
            Err(ParseDomainError)
        }
    }

    /// Whether this domain is the given domain or one of its subdomains.
    /// Comparison is done on the A-label forms, ignoring case.
    pub fn eq_or_subdomain_of(&self, other: &DomainName) -> bool {
        let (Ok(name), Ok(other)) = (
            idna::domain_to_ascii(&self.0),
            idna::domain_to_ascii(&other.0),
        ) else {
            return false;
        };

        // A-label forms are ASCII, byte offsets are safe
        match name.len().checked_sub(other.len()) {
            Some(0) => name.eq_ignore_ascii_case(&other),
            Some(n) => name[n..].eq_ignore_ascii_case(&other) && name[..n].ends_with('.'),
            None => false,
        }
    }
}

/// A selector, as used in the *s=* tag: one or more dot-separated labels.
#[derive(Clone)]
pub struct Selector(Box<str>);

impl_name_traits!(Selector);

impl Selector {
    pub fn new(s: &str) -> Result<Self, ParseSelectorError> {
        // labels like "dkim_2024" are common, so no strict hostname syntax
        if s.split('.').all(is_label) && idna::domain_to_ascii(s).is_ok() {
            Ok(Self(s.into()))
        } else {
            Err(ParseSelectorError)
        }
    }
}

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const MAX_LOCAL_PART_LEN: usize = 64;

fn is_domain_name(s: &str) -> bool {
    if !(1..=MAX_DOMAIN_LEN).contains(&s.len()) {
        return false;
    }

    // at least two labels, and the top-level label not all digits
    match s.rsplit_once('.') {
        Some((rest, tld)) => {
            is_label(tld)
                && !tld.bytes().all(|b| b.is_ascii_digit())
                && rest.split('.').all(is_label)
        }
        None => false,
    }
}

fn is_label(s: &str) -> bool {
    (1..=MAX_LABEL_LEN).contains(&s.len())
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(is_label_char)
}

// letters, digits, hyphen, underscore; non-ASCII U-label characters are
// left to the IDNA conversion
fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || !c.is_ascii()
}

/// An agent or user identifier, as used in the *i=* tag.
///
/// The local part is optional: `@example.com` identifies the domain only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub local_part: Option<Box<str>>,
    pub domain_part: DomainName,
}

impl Identity {
    pub fn new(s: &str) -> Result<Self, ParseDomainError> {
        let (local_part, domain) = s.rsplit_once('@').ok_or(ParseDomainError)?;

        let local_part = match local_part {
            "" => None,
            l if is_local_part(l) => Some(l.into()),
            _ => return Err(ParseDomainError),
        };

        let domain_part = DomainName::new(domain)?;

        Ok(Self {
            local_part,
            domain_part,
        })
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.local_part {
            Some(local_part) => write!(f, "{local_part}@{}", self.domain_part),
            None => write!(f, "@{}", self.domain_part),
        }
    }
}

// Local part syntax of RFC 5321, §4.1.2, with UTF-8 allowed per RFC 6531.
fn is_local_part(s: &str) -> bool {
    s.len() <= MAX_LOCAL_PART_LEN && (is_dot_string(s) || is_quoted_string(s))
}

fn is_dot_string(s: &str) -> bool {
    fn is_atext(c: char) -> bool {
        c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || !c.is_ascii()
    }

    s.split('.').all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return false;
    };

    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(c) if c == ' ' || c.is_ascii_graphic() => {}
                _ => return false,
            },
            '"' => return false,
            c if c == ' ' || c.is_ascii_graphic() || !c.is_ascii() => {}
            _ => return false,
        }
    }

    true
}
