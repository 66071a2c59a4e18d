// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aging;
pub mod api;
pub mod cli;
pub mod db;
pub mod filter;
pub mod matching;
pub mod metrics;
pub mod models;
pub mod utils;
pub mod commands;
