/// A measured amount as printed in an item line (e.g. `120g`).
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// A single food line inside a meal.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Food name as printed.
    pub name: String,

    /// Printed quantity.
    pub quantity: Quantity,

    /// Printed calories.
    pub kcal: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: Quantity, kcal: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            kcal,
        }
    }

    /// Calories per unit of quantity.
    #[inline]
    pub fn density(&self) -> f64 {
        if self.quantity.value > 0.0 {
            self.kcal as f64 / self.quantity.value
        } else {
            0.0
        }
    }
}

/// Body of a meal: parsed items, or the original text when the section could
/// not be isolated.
#[derive(Debug, Clone, PartialEq)]
pub enum MealBody {
    Items(Vec<Item>),
    Verbatim(String),
}

/// One meal slot of a day.
#[derive(Debug, Clone, PartialEq)]
pub struct MealBlock {
    pub name: String,

    /// Calories printed in the meal header.
    pub stated_kcal: i64,

    pub body: MealBody,

    /// Non-item lines found in a parsed body, emitted after the items.
    pub notes: Vec<String>,
}

impl MealBlock {
    pub fn items(&self) -> &[Item] {
        match &self.body {
            MealBody::Items(items) => items,
            MealBody::Verbatim(_) => &[],
        }
    }

    /// Sum of item calories.
    pub fn item_kcal(&self) -> i64 {
        self.items().iter().map(|i| i.kcal).fold(0, i64::saturating_add)
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self.body, MealBody::Verbatim(_))
    }
}

/// One day's plan parsed from a contiguous span of model output.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBlock {
    pub day_number: u32,

    /// Text between `Day N:` and the first meal header, e.g. ` Monday\n`.
    pub heading: String,

    /// Meals in order of appearance.
    pub meals: Vec<MealBlock>,

    /// `Total Daily Calories` as printed, if present.
    pub stated_total_kcal: Option<i64>,

    /// Text following the day's structured content, kept as-is.
    pub trailer: String,
}

impl DayBlock {
    pub fn meal(&self, name: &str) -> Option<&MealBlock> {
        self.meals.iter().find(|m| m.name == name)
    }

    /// Whether every parsed meal's items sum to its stated calories.
    pub fn is_balanced(&self) -> bool {
        self.meals
            .iter()
            .filter(|m| !m.is_verbatim())
            .all(|m| m.stated_kcal == m.item_kcal())
    }
}
