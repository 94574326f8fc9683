// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod banks;
pub mod categories;
pub mod doctor;
pub mod filters;
pub mod summary;
pub mod transactions;
pub mod view;
