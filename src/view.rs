use glam::Vec2;
use std::fmt;

use crate::overlay::OverlayLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Object,
    Back,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub kind: LineKind,
    pub label: String,
    pub value: Option<String>,
    pub changed: bool,
}

impl OverlayLine {
    pub(crate) fn back() -> Self {
        Self { kind: LineKind::Back, label: "<..".to_string(), value: None, changed: false }
    }
}

/// Per-frame snapshot of the console for the presentation layer.
///
/// `lines` is already windowed to the scroll offset and `highlighted` indexes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub visible: bool,
    pub panel_offset: f32,
    pub panel_height: f32,
    /// The panel is still moving toward its open or closed rest position.
    pub sliding: bool,
    pub level: OverlayLevel,
    pub title: String,
    pub lines: Vec<OverlayLine>,
    pub highlighted: Option<usize>,
    pub used_mutations: usize,
    pub mutation_budget: usize,
}

impl OverlayView {
    pub fn budget_exhausted(&self) -> bool {
        self.used_mutations >= self.mutation_budget
    }

    pub fn status_label(&self) -> String {
        format!("hacks ({} / {})", self.used_mutations, self.mutation_budget)
    }

    /// Top-left corner of the panel in y-down screen space; the panel hangs from the top edge and
    /// slides up out of view.
    pub fn panel_origin(&self) -> Vec2 {
        Vec2::new(0.0, -self.panel_offset)
    }

    pub fn highlighted_line(&self) -> Option<&OverlayLine> {
        self.highlighted.and_then(|index| self.lines.get(index))
    }
}

impl fmt::Display for OverlayView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.visible {
            return write!(f, "[console hidden] {}", self.status_label());
        }
        writeln!(f, "{}  {}  (offset {:.1})", self.title, self.status_label(), self.panel_offset)?;
        for (index, line) in self.lines.iter().enumerate() {
            let marker = if self.highlighted == Some(index) { '>' } else { ' ' };
            let changed = if line.changed { '*' } else { ' ' };
            match &line.value {
                Some(value) => writeln!(f, "{marker}{changed} {:<16} {value}", line.label)?,
                None => writeln!(f, "{marker}{changed} {}", line.label)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> OverlayView {
        OverlayView {
            visible: true,
            panel_offset: 12.0,
            panel_height: 394.0,
            sliding: true,
            level: OverlayLevel::Detail,
            title: "<variables of obj_walls>".to_string(),
            lines: vec![
                OverlayLine::back(),
                OverlayLine {
                    kind: LineKind::Field,
                    label: "solid".to_string(),
                    value: Some("false".to_string()),
                    changed: true,
                },
            ],
            highlighted: Some(1),
            used_mutations: 1,
            mutation_budget: 1,
        }
    }

    #[test]
    fn status_and_geometry() {
        let view = sample_view();
        assert!(view.budget_exhausted());
        assert_eq!(view.status_label(), "hacks (1 / 1)");
        assert_eq!(view.panel_origin(), Vec2::new(0.0, -12.0));
        assert_eq!(view.highlighted_line().map(|line| line.label.as_str()), Some("solid"));
    }

    #[test]
    fn text_dump_marks_cursor_and_changes() {
        let text = sample_view().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("<variables of obj_walls>"));
        assert_eq!(lines[1], "   <..");
        assert!(lines[2].starts_with(">* solid"));
        assert!(lines[2].ends_with("false"));
    }
}
