/// An RGB stroke or fill colour, or the absence of one ("none"/transparent).
///
/// The `None` variant is what lets the grey-restore step make a shape's
/// stroke transparent without changing the field's type to an `Option`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub enum Colour {
    Rgb(u8, u8, u8),
    None,
}

impl Colour {
    pub const BLACK: Colour = Colour::Rgb(0, 0, 0);

    /// A colour is grey when its channels lie within `tolerance` of each
    /// other; `tolerance == 0` requires them exactly equal.
    pub fn is_grey_within(self, tolerance: u16) -> bool {
        match self {
            Colour::Rgb(r, g, b) => {
                let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
                let spread = (r - g).abs() + (g - b).abs() + (r - b).abs();
                spread <= i32::from(tolerance)
            }
            Colour::None => false,
        }
    }

    /// Parses a `#rrggbb` or `#rgb` hex colour. Returns `None` (the "no
    /// colour" value, not a parse failure) for anything else, so a
    /// malformed attribute degrades gracefully instead of aborting a load.
    pub fn parse_hex(s: &str) -> Colour {
        let s = s.trim().strip_prefix('#').unwrap_or(s.trim());
        match s.len() {
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16);
                let g = u8::from_str_radix(&s[2..4], 16);
                let b = u8::from_str_radix(&s[4..6], 16);
                match (r, g, b) {
                    (Ok(r), Ok(g), Ok(b)) => Colour::Rgb(r, g, b),
                    _ => Colour::None,
                }
            }
            3 => {
                let expand = |c: char| c.to_digit(16).map(|d| (d * 17) as u8);
                let mut chars = s.chars();
                match (chars.next().and_then(expand), chars.next().and_then(expand), chars.next().and_then(expand)) {
                    (Some(r), Some(g), Some(b)) => Colour::Rgb(r, g, b),
                    _ => Colour::None,
                }
            }
            _ => Colour::None,
        }
    }

    pub fn to_hex(self) -> String {
        match self {
            Colour::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
            Colour::None => "none".to_string(),
        }
    }
}

#[test]
fn grey_detection() {
    assert!(Colour::Rgb(128, 128, 128).is_grey_within(0));
    assert!(!Colour::Rgb(128, 129, 128).is_grey_within(0));
    assert!(!Colour::None.is_grey_within(0));
}

#[test]
fn grey_within_tolerance() {
    assert!(Colour::Rgb(128, 130, 129).is_grey_within(4));
    assert!(!Colour::Rgb(128, 130, 129).is_grey_within(1));
}

#[test]
fn hex_roundtrip() {
    let c = Colour::Rgb(0xaa, 0xbb, 0xcc);
    assert_eq!(Colour::parse_hex(&c.to_hex()), c);
    assert_eq!(Colour::parse_hex("#f00"), Colour::Rgb(0xff, 0, 0));
    assert_eq!(Colour::parse_hex("not-a-colour"), Colour::None);
}
