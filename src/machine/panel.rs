//! Machine-face row model and markup renderer
//!
//! The face is three parallel vertical strips, one element per row index:
//! ballot labels on the left, the LED column in the middle, vote buttons on
//! the right. Rows beyond the candidate list render as empty placeholders
//! with no interactive affordance.

use crate::types::{Candidate, Row};

/// Static row configuration for the machine face
#[derive(Debug, Clone)]
pub struct RowModel {
    rows: Vec<Row>,
}

impl RowModel {
    /// Bind candidates to rows top-down over a fixed number of slots
    ///
    /// Candidate `k` lands on row `k`; rows past the end of the list are
    /// unbound spacers. Candidates beyond `row_count` are dropped (the face
    /// has no slot to show them on).
    pub fn new(candidates: Vec<Candidate>, row_count: usize) -> Self {
        let mut slots = candidates.into_iter().map(Some).collect::<Vec<_>>();
        slots.resize_with(row_count, || None);
        slots.truncate(row_count);

        let rows = slots
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| Row { index, candidate })
            .collect();

        Self { rows }
    }

    /// The candidate bound to a row, if the row exists and is bound
    pub fn candidate_for(&self, row_index: usize) -> Option<&Candidate> {
        self.rows.get(row_index).and_then(|r| r.candidate.as_ref())
    }

    /// All rows, in face order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows on the face
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows with a bound candidate
    pub fn bound_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_bound()).count()
    }
}

/// Rendered markup for the machine face, one element per row per strip
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFace {
    /// Ballot label strip (logo + name per bound row)
    pub labels: Vec<String>,
    /// LED column, one dot per row
    pub leds: Vec<String>,
    /// Vote button strip (spacer markup on unbound rows)
    pub buttons: Vec<String>,
}

impl PanelFace {
    /// Render the three strips for a row model
    pub fn render(model: &RowModel) -> Self {
        let mut labels = Vec::with_capacity(model.row_count());
        let mut leds = Vec::with_capacity(model.row_count());
        let mut buttons = Vec::with_capacity(model.row_count());

        for row in model.rows() {
            let blur_class = if row.is_de_emphasized() {
                " row-blur"
            } else {
                ""
            };

            match &row.candidate {
                Some(c) => {
                    labels.push(format!(
                        "<div class=\"label-item{blur_class}\">\
                         <span class=\"label-logo\" aria-hidden=\"true\">{}</span>\
                         <span class=\"label-name\">{}</span></div>",
                        c.logo_markup(),
                        c.name,
                    ));
                    buttons.push(format!(
                        "<button class=\"vote-btn{blur_class}\" type=\"button\" \
                         data-row=\"{}\" aria-label=\"Vote for {}\"></button>",
                        row.index, c.name,
                    ));
                }
                None => {
                    labels.push("<div></div>".to_string());
                    buttons.push("<div style=\"height:20px\"></div>".to_string());
                }
            }

            leds.push(format!(
                "<div class=\"led{blur_class}\" data-row=\"{}\"></div>",
                row.index,
            ));
        }

        Self {
            labels,
            leds,
            buttons,
        }
    }
}
