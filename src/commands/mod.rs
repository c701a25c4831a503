// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod profile;
pub mod salary;
pub mod loans;
pub mod expenses;
pub mod emi;
pub mod reports;
pub mod advisor;
pub mod exporter;
pub mod doctor;
