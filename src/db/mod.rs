// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer for the reference API (in-memory).

pub mod memory;

pub use memory::MemoryDb;
