// Version marker handling: the first character of every blueprint string.
use crate::codec::version::{self, Version};
use crate::core::error::{Error, ErrorKind};

pub fn add(marker: char, body: &str) -> String {
    let mut out = String::with_capacity(marker.len_utf8() + body.len());
    out.push(marker);
    out.push_str(body);
    out
}

/// Split a blueprint string into its version and the remaining body.
pub fn split(input: &str) -> Result<(Version, &str), Error> {
    let mut chars = input.chars();
    let Some(marker) = chars.next() else {
        return Err(Error::new(ErrorKind::InvalidFormat).with_message("blueprint string is empty"));
    };
    let version = version::lookup(marker).ok_or_else(|| {
        Error::new(ErrorKind::InvalidFormat)
            .with_message(format!("unknown version marker {marker:?}"))
            .with_hint("Blueprint strings start with the version marker '0'.")
    })?;
    Ok((version, chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::{add, split};
    use crate::codec::version::V0;
    use crate::core::error::ErrorKind;

    #[test]
    fn add_prepends_marker() {
        assert_eq!(add('0', "eNqrVgIAAA=="), "0eNqrVgIAAA==");
        assert_eq!(add('0', ""), "0");
    }

    #[test]
    fn split_strips_exactly_one_marker() {
        let (version, body) = split("00abc").expect("split");
        assert_eq!(version, V0);
        assert_eq!(body, "0abc");
    }

    #[test]
    fn split_rejects_empty_and_unknown_markers() {
        assert_eq!(split("").unwrap_err().kind(), ErrorKind::InvalidFormat);
        let err = split("1SGVsbG8=").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.message().unwrap().contains("'1'"));
        assert_eq!(split("é0").unwrap_err().kind(), ErrorKind::InvalidFormat);
    }
}
