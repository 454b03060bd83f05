// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use owo_colors::Style;

#[derive(Debug, Default, Clone)]
pub(super) struct Styles {
    pub(super) is_colorized: bool,
    pub(super) warning: Style,
    pub(super) success: Style,
    pub(super) fail_rule: Style,
    pub(super) fail_label: Style,
    pub(super) error_rule: Style,
    pub(super) error_label: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.is_colorized = true;
        self.warning = Style::new().yellow().bold();
        self.success = Style::new().green().bold();
        self.fail_rule = Style::new().yellow();
        self.fail_label = Style::new().yellow().bold();
        self.error_rule = Style::new().red();
        self.error_label = Style::new().red().bold();
    }
}
