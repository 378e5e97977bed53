use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::PaginationError;

const OFFSET_TAG: u8 = 1;
const ENCODED_LEN: usize = 1 + std::mem::size_of::<u64>();

/// A resume position within a sorted result set.
///
/// Clients only ever see the url-safe base64 form, which makes no promise about its content.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct GraphqlCursor {
    offset: usize,
}

impl GraphqlCursor {
    pub fn from_offset(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(self) -> usize {
        self.offset
    }

    pub fn encode(self) -> String {
        let mut bytes = [0u8; ENCODED_LEN];
        bytes[0] = OFFSET_TAG;
        bytes[1..].copy_from_slice(&(self.offset as u64).to_be_bytes());

        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl FromStr for GraphqlCursor {
    type Err = PaginationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| PaginationError::InvalidCursor(value.to_string()))?;

        let Some((&OFFSET_TAG, offset)) = bytes.split_first() else {
            return Err(PaginationError::InvalidCursor(value.to_string()));
        };

        let offset: [u8; ENCODED_LEN - 1] = offset
            .try_into()
            .map_err(|_| PaginationError::InvalidCursor(value.to_string()))?;

        let offset = usize::try_from(u64::from_be_bytes(offset))
            .map_err(|_| PaginationError::InvalidCursor(value.to_string()))?;

        Ok(Self { offset })
    }
}

impl fmt::Display for GraphqlCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_to_opaque_string() {
        insta::assert_snapshot!(GraphqlCursor::from_offset(2), @"AQAAAAAAAAAC");
    }

    #[test]
    fn decodes_what_it_encodes() {
        for offset in [0, 1, 20, 4096, u32::MAX as usize] {
            let encoded = GraphqlCursor::from_offset(offset).to_string();
            let decoded: GraphqlCursor = encoded.parse().unwrap();

            assert_eq!(offset, decoded.offset());
        }
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "not base64!", "AQ", "AgAAAAAAAAAC", "AQAAAAAAAAAAAAA"] {
            let error = input.parse::<GraphqlCursor>().unwrap_err();
            assert_eq!(PaginationError::InvalidCursor(input.to_string()), error);
        }
    }
}
