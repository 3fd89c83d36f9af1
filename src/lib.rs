// This file is part of the product Campaign Launcher.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod ai;
pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod campaign;
pub mod config;
pub mod contacts;
pub mod crm;
pub mod error;
pub mod offers;
pub mod tenant;
pub mod util;
