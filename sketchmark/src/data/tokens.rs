// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Whitespace-tokenised text source for variable-length keys.

use std::fs;
use std::path::Path;

use crate::data::VarRecords;
use crate::error::Error;

/// Default number of tokens taken from the source file.
pub const TOKEN_TAKE: usize = 500_000;

/// Reads the first `take` whitespace-separated tokens of the UTF-8 file at
/// `path`, preserving byte content and order.
pub fn word_tokens(path: &Path, take: usize) -> Result<VarRecords, Error> {
    let text = fs::read_to_string(path).map_err(|e| {
        Error::config("cannot open token file")
            .with_context("path", path.display())
            .set_source(e)
    })?;

    let mut records = VarRecords::new();
    for token in text.split_whitespace().take(take) {
        records.push(token.as_bytes());
    }
    if records.is_empty() {
        return Err(
            Error::format("no tokens parsed").with_context("path", path.display())
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_tokenisation_preserves_order_and_bytes() {
        let path = env::temp_dir().join("sketchmark_tokens_test.txt");
        fs::write(&path, "alpha  beta\n\tgamma delta\r\nepsilon").unwrap();
        let rec = word_tokens(&path, 4).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(rec.len(), 4);
        assert_eq!(rec.get(0), b"alpha");
        assert_eq!(rec.get(1), b"beta");
        assert_eq!(rec.get(2), b"gamma");
        assert_eq!(rec.get(3), b"delta");
    }

    #[test]
    fn test_empty_file_is_a_format_error() {
        let path = env::temp_dir().join("sketchmark_tokens_empty.txt");
        fs::write(&path, "  \n\t ").unwrap();
        let err = word_tokens(&path, 10).unwrap_err();
        fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
    }
}
