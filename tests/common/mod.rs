//! Common test utilities for torrent-archiver
//!
//! This module provides shared testing infrastructure including:
//! - Fixtures for listing output and torrent records
//! - A recording fake torrent client and a scripted prompt
//! - Temporary download/archive trees
//! - A fake `transmission-remote` executable

#![allow(dead_code)]

pub mod fake_remote;
pub mod fixtures;
pub mod test_helpers;
