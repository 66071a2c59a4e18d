// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod fetch;
pub mod aging;
pub mod recon;
pub mod cashflow;
pub mod export;
pub mod doctor;
