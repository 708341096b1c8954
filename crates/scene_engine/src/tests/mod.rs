//! Cross-module scene and play-mode tests

mod support;

mod play_mode;
