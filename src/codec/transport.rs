// Text transport stage: compressed bytes <-> printable base64.
use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};

use crate::codec::version::Transport;
use crate::core::error::{Error, ErrorKind};

// Padding is required on decode; non-zero trailing bits in the last symbol are tolerated
// so strings produced by more permissive encoders still load.
const STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

pub fn encode(transport: Transport, bytes: &[u8]) -> String {
    match transport {
        Transport::Base64Standard => STANDARD.encode(bytes),
    }
}

pub fn decode(transport: Transport, text: &str) -> Result<Vec<u8>, Error> {
    match transport {
        Transport::Base64Standard => STANDARD.decode(text).map_err(|err| {
            Error::new(ErrorKind::Decoding)
                .with_message("blueprint body is not valid base64")
                .with_source(err)
        }),
    }
}
