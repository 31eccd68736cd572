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

use aaguid_icons::{
    common::Mode, test::assert_dimensions, Pipeline, Profile, Registry, UNKNOWN_AAGUID,
};

#[test]
pub fn loads_local_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("authenticators.json");
    std::fs::write(
        &path,
        r#"{
            "fbfc3007-154e-4ecc-8c0b-6e020557d7bd": {
                "name": "iCloud Keychain",
                "icon_dark": "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSIxMCIgaGVpZ2h0PSIxMCIvPg"
            }
        }"#,
    )?;

    let registry = Registry::from_path(&path)?;
    assert_eq!(registry.len(), 1);
    assert!(registry.get(UNKNOWN_AAGUID).is_none());

    let keychain = registry.get("fbfc3007-154e-4ecc-8c0b-6e020557d7bd").unwrap();
    assert_eq!(keychain.name, "iCloud Keychain");
    assert!(keychain.icon(Mode::Dark).is_some());
    assert!(keychain.icon(Mode::Light).is_none());

    Ok(())
}

#[test]
pub fn missing_file_is_fatal() {
    let err = Registry::from_path("/nonexistent/authenticators.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/authenticators.json"));
}

#[test]
pub fn fallback_icons_render() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let mut registry = Registry::default();
    registry.insert_fallback();

    let run = Pipeline::new(dir.path(), 64, Profile::Upstream)?.run(&registry);
    assert!(run.is_success());
    assert_eq!(run.format_counts["svg"], 2);

    for mode in Mode::ALL {
        assert_dimensions(dir.path().join(format!("{UNKNOWN_AAGUID}-{mode}.png")), 64, 64);
    }

    Ok(())
}
