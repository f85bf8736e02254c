//! Vertical flow of the ruled timeline tables.
//!
//! A table is a header band followed by fixed-height row slots. The slots
//! hold group labels (学歴, 職歴), entries, an optional summary row (計 N 件),
//! an end marker (以上) and blank filler rows, so a short résumé still shows
//! a uniformly ruled form.

use rirekisho_types::geometry::Rect;

const EPSILON: f32 = 0.01;

/// Sizing rules of one ruled table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSpec {
    pub row_height: f32,
    pub header_height: f32,
    /// Lower bound on the table height, header included.
    pub min_height: f32,
    /// Lower bound on the number of row slots, drawn blank when unused.
    pub min_rows: usize,
    /// Adds a `計 N 件` row after the last entry.
    pub summary_row: bool,
}

/// A run of consecutive entries, optionally introduced by a label row.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGroup {
    pub label: Option<String>,
    pub entries: usize,
}

impl SectionGroup {
    pub fn labeled(label: impl Into<String>, entries: usize) -> Self {
        Self {
            label: Some(label.into()),
            entries,
        }
    }

    pub fn unlabeled(entries: usize) -> Self {
        Self {
            label: None,
            entries,
        }
    }
}

/// What a single row slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRow {
    GroupLabel { group: usize },
    Entry { group: usize, index: usize },
    /// Total number of entries across all groups.
    Summary { entries: usize },
    EndMarker,
    Blank,
}

impl FlowRow {
    pub fn is_content(&self) -> bool {
        !matches!(self, FlowRow::Blank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub row: FlowRow,
    /// Top edge of the slot in page coordinates.
    pub y: f32,
}

fn count_content(rows: &[RowSlot]) -> usize {
    rows.iter().filter(|s| s.row.is_content()).count()
}

fn entry_total(groups: &[SectionGroup]) -> usize {
    groups.iter().map(|g| g.entries).sum()
}

impl TableSpec {
    /// Height of the table when it holds no more rows than `min_rows`.
    pub fn minimum_height(&self) -> f32 {
        self.min_height
            .max(self.header_height + self.min_rows as f32 * self.row_height)
    }

    /// Label rows, the summary row and the end marker.
    pub fn overhead_rows(&self, groups: &[SectionGroup], end_marker: bool) -> usize {
        let labels = groups.iter().filter(|g| g.label.is_some()).count();
        labels + usize::from(self.summary_row) + usize::from(end_marker)
    }

    /// Rows that carry content: entries plus overhead.
    pub fn content_rows(&self, groups: &[SectionGroup], end_marker: bool) -> usize {
        entry_total(groups) + self.overhead_rows(groups, end_marker)
    }

    /// `max(minimum height, (entries + overhead) × row height + header height)`.
    pub fn total_height(&self, groups: &[SectionGroup], end_marker: bool) -> f32 {
        let rows = self.content_rows(groups, end_marker);
        let needed = rows as f32 * self.row_height + self.header_height;
        self.minimum_height().max(needed)
    }

    /// Number of whole row slots that fit below the header of a table of `height`.
    pub fn slot_count(&self, height: f32) -> usize {
        if self.row_height <= 0.0 {
            return 0;
        }
        let slots = (height - self.header_height) / self.row_height + EPSILON;
        slots.floor().max(0.0) as usize
    }

    /// Lays out a table whose top edge is `start_y`.
    ///
    /// Rows whose bottom edge passes `bottom_limit` are still listed but sit
    /// after [`TableLayout::break_at`]; renderers draw only the rows before it.
    pub fn layout(
        &self,
        start_y: f32,
        groups: &[SectionGroup],
        end_marker: bool,
        bottom_limit: f32,
    ) -> TableLayout {
        let total_height = self.total_height(groups, end_marker);
        let slots = self.slot_count(total_height);

        let mut rows = Vec::with_capacity(slots);
        let row_y = |i: usize| start_y + self.header_height + i as f32 * self.row_height;

        for (group_idx, group) in groups.iter().enumerate() {
            if group.label.is_some() {
                rows.push(FlowRow::GroupLabel { group: group_idx });
            }
            rows.extend((0..group.entries).map(|index| FlowRow::Entry {
                group: group_idx,
                index,
            }));
        }
        if self.summary_row {
            rows.push(FlowRow::Summary {
                entries: entry_total(groups),
            });
        }
        if end_marker {
            rows.push(FlowRow::EndMarker);
        }
        while rows.len() < slots {
            rows.push(FlowRow::Blank);
        }

        let rows: Vec<RowSlot> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| RowSlot { row, y: row_y(i) })
            .collect();

        let break_at = rows
            .iter()
            .position(|slot| slot.y + self.row_height > bottom_limit + EPSILON);

        if let Some(index) = break_at {
            let lost = count_content(&rows[index..]);
            if lost > 0 {
                log::warn!(
                    "Table at y={:.1} overflows the page: {} row(s) from row {} are clipped",
                    start_y,
                    lost,
                    index
                );
            }
        }

        TableLayout {
            start_y,
            groups: groups.to_vec(),
            header_height: self.header_height,
            row_height: self.row_height,
            total_height,
            bottom_limit,
            rows,
            break_at,
        }
    }
}

/// Computed geometry of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub start_y: f32,
    pub groups: Vec<SectionGroup>,
    pub header_height: f32,
    pub row_height: f32,
    /// Unclamped height from [`TableSpec::total_height`].
    pub total_height: f32,
    pub bottom_limit: f32,
    pub rows: Vec<RowSlot>,
    /// Index of the first row that does not fit on the page.
    pub break_at: Option<usize>,
}

impl TableLayout {
    /// `start_y + header_height + i × row_height`.
    pub fn row_y(&self, i: usize) -> f32 {
        self.start_y + self.header_height + i as f32 * self.row_height
    }

    /// Rows that fit on the page.
    pub fn visible_rows(&self) -> &[RowSlot] {
        match self.break_at {
            Some(index) => &self.rows[..index],
            None => &self.rows,
        }
    }

    /// Content rows that were cut off by the bottom of the page.
    pub fn clipped_rows(&self) -> usize {
        match self.break_at {
            Some(index) => count_content(&self.rows[index..]),
            None => 0,
        }
    }

    /// Height actually drawn: the full table, or up to the last row that fits.
    pub fn visible_height(&self) -> f32 {
        match self.break_at {
            Some(index) => self.header_height + index as f32 * self.row_height,
            None => self
                .total_height
                .min((self.bottom_limit - self.start_y).max(0.0)),
        }
    }

    /// Y coordinates of the rules below the header and between visible rows.
    pub fn rule_ys(&self) -> Vec<f32> {
        let visible = self.visible_rows();
        let mut ys = vec![self.start_y + self.header_height];
        ys.extend(visible.iter().map(|slot| slot.y + self.row_height));
        let bottom = self.start_y + self.visible_height();
        ys.retain(|y| *y < bottom - EPSILON);
        ys
    }

    pub fn group_label(&self, group: usize) -> Option<&str> {
        self.groups.get(group).and_then(|g| g.label.as_deref())
    }

    /// Frame of the visible part of the table for a given left edge and width.
    pub fn frame(&self, x: f32, width: f32) -> Rect {
        Rect::new(x, self.start_y, width, self.visible_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn career_spec() -> TableSpec {
        TableSpec {
            row_height: 23.0,
            header_height: 25.0,
            min_height: 380.0,
            min_rows: 15,
            summary_row: false,
        }
    }

    fn cert_spec() -> TableSpec {
        TableSpec {
            row_height: 23.0,
            header_height: 25.0,
            min_height: 0.0,
            min_rows: 4,
            summary_row: false,
        }
    }

    fn career_groups(education: usize, work: usize) -> Vec<SectionGroup> {
        vec![
            SectionGroup::labeled("学歴", education),
            SectionGroup::labeled("職歴", work),
        ]
    }

    #[test]
    fn test_total_height_follows_formula() {
        let spec = career_spec();
        for (k, m) in [(0, 0), (2, 4), (5, 9), (8, 12), (20, 30)] {
            let groups = career_groups(k, m);
            let rows = (k + m + 3) as f32;
            let expected = spec
                .minimum_height()
                .max(rows * spec.row_height + spec.header_height);
            let actual = spec.total_height(&groups, true);
            assert_eq!(actual, expected, "K={} M={}", k, m);
        }
    }

    #[test]
    fn test_min_height_dominates_short_tables() {
        let spec = career_spec();
        assert_eq!(spec.total_height(&career_groups(2, 4), true), 380.0);
        // 17 entries + 3 overhead rows = 20 rows -> 485pt
        assert_eq!(spec.total_height(&career_groups(7, 10), true), 485.0);
    }

    #[test]
    fn test_min_rows_raises_minimum_height() {
        let spec = TableSpec {
            min_rows: 20,
            ..career_spec()
        };
        assert_eq!(spec.minimum_height(), 25.0 + 20.0 * 23.0);
    }

    #[test]
    fn test_summary_row_adds_one_overhead_row() {
        let plain = career_spec();
        let summed = TableSpec {
            summary_row: true,
            ..career_spec()
        };
        let groups = career_groups(2, 4);
        assert_eq!(plain.content_rows(&groups, true), 9);
        assert_eq!(summed.content_rows(&groups, true), 10);

        // 17 entries + 2 labels + summary + end marker = 21 rows -> 508pt
        let groups = career_groups(7, 10);
        assert_eq!(summed.total_height(&groups, true), 508.0);
        assert_eq!(
            summed.total_height(&groups, true) - plain.total_height(&groups, true),
            23.0
        );
    }

    #[test]
    fn test_summary_row_sits_between_entries_and_marker() {
        let spec = TableSpec {
            summary_row: true,
            ..career_spec()
        };
        let layout = spec.layout(0.0, &career_groups(1, 2), true, 10_000.0);
        let kinds: Vec<FlowRow> = layout.rows.iter().map(|s| s.row).collect();
        assert_eq!(kinds[4], FlowRow::Entry { group: 1, index: 1 });
        assert_eq!(kinds[5], FlowRow::Summary { entries: 3 });
        assert_eq!(kinds[6], FlowRow::EndMarker);
        assert_eq!(kinds[7], FlowRow::Blank);
    }

    #[test]
    fn test_row_offsets() {
        let spec = career_spec();
        let layout = spec.layout(280.0, &career_groups(2, 4), true, 821.89);
        for (i, slot) in layout.rows.iter().enumerate() {
            assert_eq!(slot.y, 280.0 + 25.0 + i as f32 * 23.0);
            assert_eq!(slot.y, layout.row_y(i));
        }
    }

    #[test]
    fn test_row_order_labels_entries_marker_then_blanks() {
        let spec = career_spec();
        let layout = spec.layout(0.0, &career_groups(1, 2), true, 10_000.0);
        let kinds: Vec<FlowRow> = layout.rows.iter().map(|s| s.row).collect();
        assert_eq!(
            &kinds[..6],
            &[
                FlowRow::GroupLabel { group: 0 },
                FlowRow::Entry { group: 0, index: 0 },
                FlowRow::GroupLabel { group: 1 },
                FlowRow::Entry { group: 1, index: 0 },
                FlowRow::Entry { group: 1, index: 1 },
                FlowRow::EndMarker,
            ]
        );
        assert!(kinds[6..].iter().all(|r| *r == FlowRow::Blank));
        assert_eq!(kinds.len(), 15);
    }

    #[test]
    fn test_empty_table_still_has_minimum_blank_rows() {
        let spec = cert_spec();
        let groups = [SectionGroup::unlabeled(0)];
        let layout = spec.layout(50.0, &groups, false, 821.89);
        assert_eq!(layout.rows.len(), 4);
        assert!(layout.rows.iter().all(|s| s.row == FlowRow::Blank));
        assert_eq!(layout.total_height, 25.0 + 4.0 * 23.0);
        assert_eq!(layout.rule_ys().len(), 4);
    }

    #[test]
    fn test_overflow_sets_break_point_and_clips() {
        let spec = career_spec();
        // 30 + 3 rows starting at 280 on an A4 page: only 22 slots fit.
        let layout = spec.layout(280.0, &career_groups(10, 20), true, 821.89);
        assert_eq!(layout.rows.len(), 33);
        assert_eq!(layout.break_at, Some(22));
        assert_eq!(layout.visible_rows().len(), 22);
        assert_eq!(layout.clipped_rows(), 11);
        assert_eq!(layout.visible_height(), 25.0 + 22.0 * 23.0);
        assert!(layout.start_y + layout.visible_height() <= 821.89);
    }

    #[test]
    fn test_rules_stay_inside_visible_frame() {
        let spec = career_spec();
        let layout = spec.layout(280.0, &career_groups(2, 4), true, 821.89);
        let bottom = layout.start_y + layout.visible_height();
        let rules = layout.rule_ys();
        assert_eq!(rules[0], 305.0);
        assert!(rules.iter().all(|y| *y < bottom));
        // header rule plus the bottom rule of each of the 15 rows; the last
        // one sits 10pt above the frame because 380pt is not a whole row count.
        assert_eq!(rules.len(), 16);
        assert_eq!(*rules.last().unwrap(), 650.0);
    }
}
