//! Unit tests for the token service

mod codec_tests;
