// Copyright (c) 2024 Jan Holthuis <jan.holthuis@rub.de>
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Date-related utility functions.

use regex::Regex;

/// Find the four-digit year at the start of a date string like `1962-01-17`.
pub fn leading_year(value: &str) -> Option<&str> {
    let re = Regex::new(r"^[0-9]{4}").ok()?;
    re.find(value).map(|m| m.as_str())
}

/// Reduce a date string to its leading year, or return it unchanged if it does not start with one.
pub fn parse_year(value: &str) -> &str {
    leading_year(value).unwrap_or(value)
}
