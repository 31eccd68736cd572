/* Copyright 2025 Ubique Innovation AG

Licensed to the Apache Software Foundation (ASF) under one
or more contributor license agreements.  See the NOTICE file
distributed with this work for additional information
regarding copyright ownership.  The ASF licenses this file
to you under the Apache License, Version 2.0 (the
"License"); you may not use this file except in compliance
with the License.  You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing,
software distributed under the License is distributed on an
"AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
KIND, either express or implied.  See the License for the
specific language governing permissions and limitations
under the License.
 */

use std::borrow::Cow;

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig},
        DecodePaddingMode,
    },
    Engine,
};
use tracing::debug;

use crate::common::{Alphabet, IconError, IconFormat};
use crate::data_uri::DataUri;

// Registry payloads are produced by many vendors; some leave garbage in the
// unused low bits of the last symbol.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::RequireCanonical);

pub const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
pub const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIcon {
    pub format: IconFormat,
    pub bytes: Vec<u8>,
}

/// Strips whitespace and appends `=` until the length is a multiple of 4.
pub fn pad(payload: &str) -> Cow<'_, str> {
    let payload: Cow<'_, str> = if payload.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(
            payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect(),
        )
    } else {
        Cow::Borrowed(payload)
    };

    match payload.len() % 4 {
        0 => payload,
        rem => {
            let mut padded = payload.into_owned();
            padded.extend(std::iter::repeat('=').take(4 - rem));
            debug!("Padding added: {}", padded.len());
            Cow::Owned(padded)
        }
    }
}

pub fn decode(payload: &str, alphabet: Alphabet) -> Result<Vec<u8>, IconError> {
    let payload = pad(payload);
    let bytes = match alphabet {
        Alphabet::Standard => STANDARD_LENIENT.decode(payload.as_bytes())?,
        Alphabet::UrlSafe => URL_SAFE_LENIENT.decode(payload.as_bytes())?,
    };
    Ok(bytes)
}

pub fn decode_uri(uri: &DataUri<'_>, alphabet: Alphabet) -> Result<DecodedIcon, IconError> {
    Ok(DecodedIcon {
        format: uri.format.clone(),
        bytes: decode(uri.payload, alphabet)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_multiple_of_four() {
        assert_eq!(pad("QQ"), "QQ==");
        assert_eq!(pad("QUI"), "QUI=");
        assert_eq!(pad("QUJD"), "QUJD");
        assert_eq!(pad("QU\nJD\r\n"), "QUJD");
    }

    #[test]
    fn decodes_unpadded() -> anyhow::Result<()> {
        assert_eq!(decode("QQ", Alphabet::Standard)?, b"A");
        assert_eq!(decode("QUI", Alphabet::Standard)?, b"AB");
        Ok(())
    }

    #[test]
    fn alphabets_differ() -> anyhow::Result<()> {
        // 0xfb 0xff encodes to `+/8` vs `-_8`
        assert_eq!(decode("-_8", Alphabet::UrlSafe)?, vec![0xfb, 0xff]);
        assert_eq!(decode("+/8", Alphabet::Standard)?, vec![0xfb, 0xff]);
        assert!(decode("-_8", Alphabet::Standard).is_err());
        assert!(decode("+/8", Alphabet::UrlSafe).is_err());
        Ok(())
    }

    #[test]
    fn tolerates_trailing_bits() -> anyhow::Result<()> {
        // canonical form is `QQ==`
        assert_eq!(decode("QR==", Alphabet::Standard)?, b"A");
        Ok(())
    }

    #[test]
    fn corrupt_payload_fails() {
        // one symbol over a full quantum cannot be repaired by padding
        let err = decode("QUJDR", Alphabet::Standard).unwrap_err();
        assert_eq!(err.stage(), "decode");
        assert!(decode("@@@@", Alphabet::Standard).is_err());
    }
}
