use std::ops::Range;

use regex::Regex;

use crate::error::{PlanError, Result};
use crate::models::{DayBlock, Item, MealBlock, MealBody, Quantity};
use crate::planner::constants::{DEFAULT_ITEM_UNIT, MAX_PLAN_FIGURE};

/// Extracts structured days from the model's plan template.
///
/// Patterns are compiled once; share one parser per process or per stream.
#[derive(Debug, Clone)]
pub struct DayBlockParser {
    day_header: Regex,
    meal_header: Regex,
    item_line: Regex,
    daily_total: Regex,
    quantity: Regex,
    end_marker: String,
}

impl DayBlockParser {
    pub fn new(end_marker: impl Into<String>) -> Result<Self> {
        Ok(Self {
            day_header: Regex::new(r"Day (\d+):")?,
            meal_header: Regex::new(r"(?m)^[ \t]*-[ \t]*(.+?)[ \t]*\((\d+)[ \t]*kcal\):")?,
            item_line: Regex::new(
                r"(?m)^[ \t]*\d+\.[ \t]*(.+?)[ \t]+—[ \t]+(.+?)[ \t]+—[ \t]+(\d+)[ \t]*kcal",
            )?,
            daily_total: Regex::new(r"Total Daily Calories:[ \t]*(\d+)[ \t]*kcal")?,
            quantity: Regex::new(r"^(\d+(?:\.\d+)?)\s*(\w*)")?,
            end_marker: end_marker.into(),
        })
    }

    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// Byte ranges of every `Day N:` header in `text`, in order.
    pub fn day_headers(&self, text: &str) -> Vec<Range<usize>> {
        self.day_header.find_iter(text).map(|m| m.range()).collect()
    }

    /// Parse a single day's text.
    ///
    /// Filler lines (zero quantity, zero kcal, `Adjust...` placeholders) are
    /// dropped. A meal whose body holds no item line is kept verbatim, and
    /// other stray lines inside a meal are kept as notes. A day with content
    /// but no recognizable meal header is malformed.
    pub fn parse(&self, text: &str) -> Result<DayBlock> {
        let caps = self
            .day_header
            .captures(text)
            .ok_or_else(|| PlanError::malformed(text, "no `Day N:` header"))?;
        let header = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let day_number: u32 = caps[1]
            .parse()
            .map_err(|_| PlanError::malformed(text, "day number out of range"))?;

        let marker_pos = text[header.end..]
            .find(&self.end_marker)
            .map(|p| header.end + p)
            .unwrap_or(text.len());
        let plan_text = &text[..marker_pos];

        let (content_end, trailer_start, stated_total_kcal) =
            match self.daily_total.captures_at(plan_text, header.end) {
                Some(c) => {
                    let whole = c.get(0).map(|m| m.range()).unwrap_or(0..0);
                    (whole.start, whole.end, Some(figure(&c[1], text)?))
                }
                None => {
                    let trimmed = plan_text.trim_end().len().max(header.end);
                    (trimmed, trimmed, None)
                }
            };

        let content = &text[header.end..content_end];
        let mut headers = Vec::new();
        for c in self.meal_header.captures_iter(content) {
            let Some(whole) = c.get(0) else {
                continue;
            };
            headers.push((
                header.end + whole.start(),
                header.end + whole.end(),
                c[1].trim().to_string(),
                figure(&c[2], text)?,
            ));
        }
        if headers.is_empty() && !content.trim().is_empty() {
            return Err(PlanError::malformed(text, "no meal header matched"));
        }
        let heading_end = headers.first().map_or(content_end, |(start, ..)| *start);

        let mut meals = Vec::with_capacity(headers.len());
        for (i, (start, body_start, name, stated_kcal)) in headers.iter().enumerate() {
            let body_end = headers
                .get(i + 1)
                .map(|(next_start, ..)| *next_start)
                .unwrap_or(content_end);
            let body = &text[*body_start..body_end];

            let (meal_body, notes) = match self.parse_items(body, text)? {
                Some((items, notes)) => (MealBody::Items(items), notes),
                None => {
                    let err = PlanError::UnmatchedMealSection { meal: name.clone() };
                    tracing::debug!(day = day_number, "{err}, keeping original text");
                    (MealBody::Verbatim(text[*start..body_end].to_string()), Vec::new())
                }
            };

            meals.push(MealBlock {
                name: name.clone(),
                stated_kcal: *stated_kcal,
                body: meal_body,
                notes,
            });
        }

        Ok(DayBlock {
            day_number,
            heading: text[header.end..heading_end].to_string(),
            meals,
            stated_total_kcal,
            trailer: text[trailer_start..].to_string(),
        })
    }

    /// Items and stray note lines of one meal body, or `None` when no line
    /// matches the item shape.
    fn parse_items(&self, body: &str, day_text: &str) -> Result<Option<(Vec<Item>, Vec<String>)>> {
        let mut matched = false;
        let mut items = Vec::new();
        let mut notes = Vec::new();

        for line in body.lines() {
            let Some(caps) = self.item_line.captures(line) else {
                if !line.trim().is_empty() && !is_placeholder(line) {
                    notes.push(line.to_string());
                }
                continue;
            };
            matched = true;
            let name = caps[1].trim();
            let kcal = figure(&caps[3], day_text)?;
            let quantity = self.parse_quantity(&caps[2]);
            if quantity.value > MAX_PLAN_FIGURE as f64 {
                return Err(PlanError::malformed(
                    day_text,
                    format!("quantity {} out of range", &caps[2]),
                ));
            }

            if is_placeholder(name) || quantity.value <= 0.0 || kcal <= 0 {
                continue;
            }
            items.push(Item::new(name, quantity, kcal));
        }

        Ok(matched.then_some((items, notes)))
    }

    /// Split `120g` / `1.5 cup` into magnitude and unit; unparseable text is zero.
    pub fn parse_quantity(&self, text: &str) -> Quantity {
        match self.quantity.captures(text.trim()) {
            Some(caps) => {
                let value = caps[1].parse().unwrap_or(0.0);
                let unit = match &caps[2] {
                    "" => DEFAULT_ITEM_UNIT,
                    unit => unit,
                };
                Quantity::new(value, unit)
            }
            None => Quantity::new(0.0, DEFAULT_ITEM_UNIT),
        }
    }
}

/// A printed kcal figure, bounded so sums over a day cannot overflow.
fn figure(digits: &str, day_text: &str) -> Result<i64> {
    digits
        .parse::<i64>()
        .ok()
        .filter(|value| *value <= MAX_PLAN_FIGURE)
        .ok_or_else(|| PlanError::malformed(day_text, format!("figure {digits} out of range")))
}

/// Placeholder filler such as `Adjust portions as needed`, ordinal or not.
fn is_placeholder(text: &str) -> bool {
    text.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c.is_whitespace())
        .to_lowercase()
        .starts_with("adjust")
}
