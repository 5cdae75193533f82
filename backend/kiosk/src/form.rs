use intake::{Field, Kind, RawCheckIn, Reason};

/// What the kiosk user has typed and picked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInForm {
    pub kind: Kind,
    pub reason: Reason,
    pub name: String,
    pub phone: String,
    pub other_reason: String,
    pub product_name: String,
    pub notes: String,
    /// Honeypot, never rendered for people.
    pub company: String,
}

impl Default for CheckInForm {
    fn default() -> Self {
        Self::new(Kind::New)
    }
}

impl CheckInForm {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            reason: Reason::Scheduled,
            name: String::new(),
            phone: String::new(),
            other_reason: String::new(),
            product_name: String::new(),
            notes: String::new(),
            company: String::new(),
        }
    }

    /// Opens on the tab named by a `?kind=` link, new patients otherwise.
    pub fn preselect(kind: Option<&str>) -> Self {
        Self::new(kind.and_then(Kind::from_query).unwrap_or(Kind::New))
    }

    /// Inputs on screen for the current reason, in display order.
    pub fn visible_fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Name, Field::Reason];

        if self.reason == Reason::Other {
            fields.push(Field::OtherReason);
        }
        fields.push(Field::Phone);
        if self.reason == Reason::Pharma {
            fields.push(Field::ProductName);
        }
        fields.push(Field::Notes);

        fields
    }

    /// Hidden conditional inputs are not submitted, whatever they still hold.
    pub fn to_raw(&self) -> RawCheckIn {
        let visible = self.visible_fields();
        let conditional = |field: Field, value: &str| {
            if visible.contains(&field) {
                value.to_string()
            } else {
                String::new()
            }
        };

        let mut raw = RawCheckIn::default();
        raw.set(Field::Kind, self.kind.as_str())
            .set(Field::Reason, self.reason.as_str())
            .set(Field::Name, self.name.trim())
            .set(Field::Phone, self.phone.trim())
            .set(Field::OtherReason, conditional(Field::OtherReason, &self.other_reason))
            .set(Field::ProductName, conditional(Field::ProductName, &self.product_name))
            .set(Field::Notes, self.notes.as_str())
            .set(Field::Company, self.company.as_str());

        raw
    }

    /// Clears the text inputs. The selected tab and reason stay.
    pub fn reset(&mut self) {
        *self = Self {
            kind: self.kind,
            reason: self.reason,
            ..Self::default()
        };
    }
}
