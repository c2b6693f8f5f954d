// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests over arbitrary records, keys and byte strings.
pub mod strategies;
