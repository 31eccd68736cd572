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

use crate::common::IconFormat;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A `data:<mediatype>;base64,<payload>` string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub media_type: &'a str,
    pub format: IconFormat,
    pub payload: &'a str,
}

/// Returns `None` for anything that is not a base64 data-URI, e.g. a plain URL.
pub fn parse(s: &str) -> Option<DataUri<'_>> {
    let body = s.strip_prefix(SCHEME)?;
    let (media_type, payload) = body.split_once(BASE64_MARKER)?;

    // drop media type parameters such as `;charset=utf-8`
    let essence = media_type.split(';').next().unwrap_or(media_type);
    let subtype = essence.rsplit('/').next().unwrap_or(essence);

    Some(DataUri {
        media_type,
        format: IconFormat::from_subtype(subtype),
        payload,
    })
}
