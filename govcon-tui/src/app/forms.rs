use std::str::FromStr;

use govcon::domain::dates::{parse_date, start_of_day};
use govcon::domain::{
    format_allocation, to_date_input, AssignResource, Contract, ContractId, ContractResource,
    ContractType, CreateContract, CreateLcat, CreateResource, Lcat, LcatId, Resource,
    ResourceAvailability, ResourceId, ResourceType, UpdateFunding, UpdateResource,
    UpdateResourceAssignment,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::OffsetDateTime;

use super::TextInput;

#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    NewContract,
    UpdateFunding(ContractId),
    NewResource,
    EditResource(ResourceId),
    TerminateResource(ResourceId),
    NewLcat,
    AssignResource(ContractId),
    EditAssignment {
        contract_id: ContractId,
        resource_id: ResourceId,
    },
    RemoveAssignment {
        contract_id: ContractId,
        resource_id: ResourceId,
    },
    StageResourceRate(ResourceId),
    StageLcatRates(LcatId),
}

/// A validated form, ready to send or stage.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    CreateContract(CreateContract),
    UpdateFunding(ContractId, UpdateFunding),
    CreateResource(CreateResource),
    UpdateResource(UpdateResource),
    TerminateResource(ResourceId, OffsetDateTime),
    CreateLcat(CreateLcat),
    AssignResource(ContractId, AssignResource),
    UpdateAssignment(ContractId, ResourceId, UpdateResourceAssignment),
    RemoveAssignment(ContractId, ResourceId, Option<OffsetDateTime>),
    StageResourceRate(ResourceId, Decimal),
    StageLcatRates(LcatId, Option<Decimal>, Option<Decimal>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub input: TextInput,
    /// (label, value) pairs. Empty for free text.
    pub choices: Vec<(String, String)>,
    pub selected: usize,
}

impl FormField {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            input: TextInput::with_value(value),
            choices: Vec::new(),
            selected: 0,
        }
    }

    fn choice(label: &'static str, choices: Vec<(String, String)>, selected: usize) -> Self {
        Self {
            label,
            input: TextInput::new(),
            choices,
            selected,
        }
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// What the field shows: the typed text or the selected choice label.
    pub fn display(&self) -> &str {
        match self.choices.get(self.selected) {
            Some((label, _)) => label,
            None => &self.input.value,
        }
    }

    fn value(&self) -> &str {
        match self.choices.get(self.selected) {
            Some((_, value)) => value,
            None => self.input.trimmed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub error: Option<String>,
}

fn yes_no(yes: bool) -> (Vec<(String, String)>, usize) {
    (
        vec![
            ("Yes".to_string(), "true".to_string()),
            ("No".to_string(), "false".to_string()),
        ],
        if yes { 0 } else { 1 },
    )
}

fn contract_type_choices() -> Vec<(String, String)> {
    ContractType::ALL
        .iter()
        .map(|t| (t.label().to_string(), format!("{:?}", t)))
        .collect()
}

fn resource_type_choices() -> Vec<(String, String)> {
    ResourceType::ALL
        .iter()
        .map(|t| (t.label().to_string(), t.as_str().to_string()))
        .collect()
}

/// LCAT picker with an empty placeholder first, so "no LCAT" can be caught.
fn lcat_choices(lcats: &[Lcat]) -> Vec<(String, String)> {
    std::iter::once(("Select LCAT".to_string(), String::new()))
        .chain(
            lcats
                .iter()
                .filter(|l| l.is_active)
                .map(|l| (l.name.clone(), l.id.to_string())),
        )
        .collect()
}

fn decimal_text(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

/// Parse a money or percentage entry, tolerating `$`, `%` and thousands separators.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(value)
    }
}

fn amount(value: &str, name: &str) -> Result<Decimal, String> {
    parse_amount(value).ok_or_else(|| format!("{} must be a number", name))
}

fn optional_amount(value: &str, name: &str) -> Result<Option<Decimal>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    amount(value, name).map(Some)
}

fn date(value: &str, name: &str) -> Result<OffsetDateTime, String> {
    parse_date(value)
        .map(start_of_day)
        .ok_or_else(|| format!("{} must be a date (YYYY-MM-DD)", name))
}

fn optional_date(value: &str, name: &str) -> Result<Option<OffsetDateTime>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    date(value, name).map(Some)
}

fn allocation(value: &str) -> Result<Decimal, String> {
    let pct = amount(value, "Allocation")?;
    if pct < Decimal::ONE || pct > dec!(100) {
        return Err("Allocation must be between 1 and 100".to_string());
    }
    Ok(pct)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl FormState {
    fn build(kind: FormKind, title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            title: title.into(),
            fields,
            focused: 0,
            error: None,
        }
    }

    pub fn new_contract(today: OffsetDateTime) -> Self {
        let draft = CreateContract::draft(today);
        let (prime, prime_idx) = yes_no(draft.is_prime);
        let type_idx = ContractType::ALL
            .iter()
            .position(|t| *t == draft.contract_type)
            .unwrap_or(0);
        Self::build(
            FormKind::NewContract,
            "New Contract",
            vec![
                FormField::text("Contract number", ""),
                FormField::text("Contract name", ""),
                FormField::text("Customer", ""),
                FormField::text("Prime contractor", ""),
                FormField::choice("We are prime", prime, prime_idx),
                FormField::choice("Type", contract_type_choices(), type_idx),
                FormField::text("Start date", &to_date_input(draft.start_date)),
                FormField::text("End date", &to_date_input(draft.end_date)),
                FormField::text("Total value", ""),
                FormField::text("Funded value", ""),
                FormField::text(
                    "Full-time hours",
                    &decimal_text(Some(draft.standard_full_time_hours)),
                ),
                FormField::text("Description", ""),
            ],
        )
    }

    pub fn update_funding(contract: &Contract) -> Self {
        Self::build(
            FormKind::UpdateFunding(contract.id.clone()),
            format!("Update Funding · {}", contract.contract_number),
            vec![
                FormField::text("Modification #", ""),
                FormField::text("Funded amount", &decimal_text(Some(contract.funded_value))),
                FormField::text("Justification", ""),
            ],
        )
    }

    pub fn new_resource(lcats: &[Lcat], today: OffsetDateTime) -> Self {
        Self::build(
            FormKind::NewResource,
            "New Resource",
            vec![
                FormField::text("First name", ""),
                FormField::text("Last name", ""),
                FormField::text("Email", ""),
                FormField::choice("Type", resource_type_choices(), 0),
                FormField::choice("LCAT", lcat_choices(lcats), 0),
                FormField::text("Hourly rate", ""),
                FormField::text("Annual salary", ""),
                FormField::text("Start date", &to_date_input(today)),
            ],
        )
    }

    pub fn edit_resource(resource: &Resource, lcats: &[Lcat]) -> Self {
        let choices = lcat_choices(lcats);
        let lcat_idx = choices
            .iter()
            .position(|(_, id)| id == resource.lcat_id.as_str())
            .unwrap_or(0);
        Self::build(
            FormKind::EditResource(resource.id.clone()),
            format!("Edit · {}", resource.full_name),
            vec![
                FormField::text("First name", &resource.first_name),
                FormField::text("Last name", &resource.last_name),
                FormField::text("Email", &resource.email),
                FormField::choice("LCAT", choices, lcat_idx),
                FormField::text("Hourly rate", &decimal_text(Some(resource.hourly_rate))),
            ],
        )
    }

    pub fn terminate_resource(resource: &Resource, today: OffsetDateTime) -> Self {
        Self::build(
            FormKind::TerminateResource(resource.id.clone()),
            format!("Terminate · {}", resource.full_name),
            vec![FormField::text("End date", &to_date_input(today))],
        )
    }

    pub fn new_lcat() -> Self {
        Self::build(
            FormKind::NewLcat,
            "New LCAT",
            vec![
                FormField::text("Name", ""),
                FormField::text("Description", ""),
                FormField::text("Published rate", ""),
                FormField::text("Default bill rate", ""),
                FormField::text("Position titles", ""),
            ],
        )
    }

    pub fn assign_resource(
        contract: &Contract,
        available: &[ResourceAvailability],
        today: OffsetDateTime,
    ) -> Self {
        let choices = std::iter::once(("Select resource".to_string(), String::new()))
            .chain(available.iter().map(|a| {
                (
                    format!(
                        "{} ({} free)",
                        a.resource_name,
                        format_allocation(a.available_allocation)
                    ),
                    a.resource_id.to_string(),
                )
            }))
            .collect();
        Self::build(
            FormKind::AssignResource(contract.id.clone()),
            format!("Assign Resource · {}", contract.contract_number),
            vec![
                FormField::choice("Resource", choices, 0),
                FormField::text("Allocation %", "100"),
                FormField::text(
                    "Annual hours",
                    &decimal_text(Some(contract.standard_full_time_hours)),
                ),
                FormField::text("Start date", &to_date_input(today.max(contract.start_date))),
                FormField::text("End date", ""),
                FormField::text("Bill rate override", ""),
            ],
        )
    }

    pub fn edit_assignment(row: &ContractResource) -> Self {
        Self::build(
            FormKind::EditAssignment {
                contract_id: row.contract_id.clone(),
                resource_id: row.resource_id.clone(),
            },
            format!("Edit Assignment · {}", row.resource_name),
            vec![
                FormField::text("Allocation %", &decimal_text(Some(row.allocation_percentage))),
                FormField::text("Annual hours", &decimal_text(Some(row.annual_hours))),
                FormField::text(
                    "End date",
                    &row.end_date.map(to_date_input).unwrap_or_default(),
                ),
                FormField::text(
                    "Bill rate override",
                    &decimal_text(row.contract_bill_rate_override),
                ),
            ],
        )
    }

    pub fn remove_assignment(row: &ContractResource) -> Self {
        Self::build(
            FormKind::RemoveAssignment {
                contract_id: row.contract_id.clone(),
                resource_id: row.resource_id.clone(),
            },
            format!("Remove · {}", row.resource_name),
            vec![FormField::text("End date (blank = today)", "")],
        )
    }

    pub fn stage_resource_rate(resource: &Resource, pending: Option<Decimal>) -> Self {
        Self::build(
            FormKind::StageResourceRate(resource.id.clone()),
            format!("Rate · {}", resource.full_name),
            vec![FormField::text(
                "Hourly rate",
                &decimal_text(Some(pending.unwrap_or(resource.hourly_rate))),
            )],
        )
    }

    pub fn stage_lcat_rates(lcat: &Lcat) -> Self {
        Self::build(
            FormKind::StageLcatRates(lcat.id.clone()),
            format!("Rates · {}", lcat.name),
            vec![
                FormField::text("Published rate", &decimal_text(lcat.current_published_rate)),
                FormField::text(
                    "Default bill rate",
                    &decimal_text(lcat.current_default_bill_rate),
                ),
            ],
        )
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focused)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if !field.is_choice() {
                field.input.insert(c);
                self.error = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.input.backspace();
        }
    }

    /// Left/Right: move the cursor in text fields, cycle choice fields.
    pub fn move_horizontal(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focused) else {
            return;
        };
        if field.is_choice() {
            let n = field.choices.len();
            field.selected = if forward {
                (field.selected + 1) % n
            } else {
                (field.selected + n - 1) % n
            };
        } else if forward {
            field.input.move_right();
        } else {
            field.input.move_left();
        }
    }

    fn get(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(FormField::value)
            .unwrap_or_default()
    }

    /// Check the inputs and build the request they describe.
    pub fn validate(&self) -> Result<FormSubmission, String> {
        match &self.kind {
            FormKind::NewContract => self.validate_contract().map(FormSubmission::CreateContract),
            FormKind::UpdateFunding(id) => {
                let modification_number =
                    required(self.get("Modification #"), "Modification number is required")?;
                let funded_amount = amount(self.get("Funded amount"), "Funded amount")?;
                if funded_amount < Decimal::ZERO {
                    return Err("Funded amount cannot be negative".to_string());
                }
                Ok(FormSubmission::UpdateFunding(
                    id.clone(),
                    UpdateFunding {
                        modification_number: modification_number.to_string(),
                        funded_amount,
                        justification: non_empty(self.get("Justification")),
                    },
                ))
            }
            FormKind::NewResource => self.validate_resource().map(FormSubmission::CreateResource),
            FormKind::EditResource(id) => {
                let lcat = required(self.get("LCAT"), "Please select an LCAT")?;
                let rate = amount(self.get("Hourly rate"), "Hourly rate")?;
                if rate <= Decimal::ZERO {
                    return Err("Hourly rate must be greater than zero".to_string());
                }
                Ok(FormSubmission::UpdateResource(UpdateResource {
                    first_name: Some(
                        required(self.get("First name"), "First name is required")?.to_string(),
                    ),
                    last_name: Some(
                        required(self.get("Last name"), "Last name is required")?.to_string(),
                    ),
                    email: Some(required(self.get("Email"), "Email is required")?.to_string()),
                    lcat_id: Some(LcatId::new(lcat)),
                    hourly_rate: Some(rate),
                    ..UpdateResource::new(id.clone())
                }))
            }
            FormKind::TerminateResource(id) => Ok(FormSubmission::TerminateResource(
                id.clone(),
                date(self.get("End date"), "End date")?,
            )),
            FormKind::NewLcat => {
                let name = required(self.get("Name"), "Name is required")?;
                Ok(FormSubmission::CreateLcat(CreateLcat {
                    name: name.to_string(),
                    description: self.get("Description").to_string(),
                    published_rate: amount(self.get("Published rate"), "Published rate")?,
                    default_bill_rate: amount(self.get("Default bill rate"), "Default bill rate")?,
                    position_titles: CreateLcat::parse_titles(self.get("Position titles")),
                }))
            }
            FormKind::AssignResource(contract_id) => {
                let resource = required(self.get("Resource"), "Please select a resource")?;
                Ok(FormSubmission::AssignResource(
                    contract_id.clone(),
                    AssignResource {
                        resource_id: ResourceId::new(resource),
                        allocation_percentage: allocation(self.get("Allocation %"))?,
                        annual_hours: amount(self.get("Annual hours"), "Annual hours")?,
                        start_date: date(self.get("Start date"), "Start date")?,
                        end_date: optional_date(self.get("End date"), "End date")?,
                        contract_bill_rate_override: optional_amount(
                            self.get("Bill rate override"),
                            "Bill rate override",
                        )?,
                    },
                ))
            }
            FormKind::EditAssignment {
                contract_id,
                resource_id,
            } => Ok(FormSubmission::UpdateAssignment(
                contract_id.clone(),
                resource_id.clone(),
                UpdateResourceAssignment {
                    allocation_percentage: Some(allocation(self.get("Allocation %"))?),
                    annual_hours: Some(amount(self.get("Annual hours"), "Annual hours")?),
                    end_date: optional_date(self.get("End date"), "End date")?,
                    contract_bill_rate_override: optional_amount(
                        self.get("Bill rate override"),
                        "Bill rate override",
                    )?,
                },
            )),
            FormKind::RemoveAssignment {
                contract_id,
                resource_id,
            } => Ok(FormSubmission::RemoveAssignment(
                contract_id.clone(),
                resource_id.clone(),
                optional_date(self.get("End date (blank = today)"), "End date")?,
            )),
            FormKind::StageResourceRate(id) => {
                let rate = amount(self.get("Hourly rate"), "Hourly rate")?;
                if rate <= Decimal::ZERO {
                    return Err("Hourly rate must be greater than zero".to_string());
                }
                Ok(FormSubmission::StageResourceRate(id.clone(), rate))
            }
            FormKind::StageLcatRates(id) => Ok(FormSubmission::StageLcatRates(
                id.clone(),
                optional_amount(self.get("Published rate"), "Published rate")?,
                optional_amount(self.get("Default bill rate"), "Default bill rate")?,
            )),
        }
    }

    fn validate_contract(&self) -> Result<CreateContract, String> {
        let number = required(self.get("Contract number"), "Contract number is required")?;
        let name = required(self.get("Contract name"), "Contract name is required")?;
        let start_date = date(self.get("Start date"), "Start date")?;
        let end_date = date(self.get("End date"), "End date")?;
        if end_date <= start_date {
            return Err("End date must be after start date".to_string());
        }
        let total_value = amount(self.get("Total value"), "Total value")?;
        let funded_value = amount(self.get("Funded value"), "Funded value")?;
        if funded_value > total_value {
            return Err("Funded value cannot exceed total value".to_string());
        }
        let contract_type = ContractType::ALL
            .into_iter()
            .find(|t| format!("{:?}", t) == self.get("Type"))
            .unwrap_or(ContractType::TimeAndMaterials);
        Ok(CreateContract {
            contract_number: number.to_string(),
            contract_name: name.to_string(),
            customer_name: self.get("Customer").to_string(),
            prime_contractor: self.get("Prime contractor").to_string(),
            is_prime: self.get("We are prime") == "true",
            contract_type,
            start_date,
            end_date,
            total_value,
            funded_value,
            standard_full_time_hours: amount(self.get("Full-time hours"), "Full-time hours")?,
            description: non_empty(self.get("Description")),
        })
    }

    fn validate_resource(&self) -> Result<CreateResource, String> {
        let first_name = required(self.get("First name"), "First name is required")?;
        let last_name = required(self.get("Last name"), "Last name is required")?;
        let email = required(self.get("Email"), "Email is required")?;
        let lcat = required(self.get("LCAT"), "Please select an LCAT")?;
        let hourly_rate = amount(self.get("Hourly rate"), "Hourly rate")?;
        if hourly_rate <= Decimal::ZERO {
            return Err("Hourly rate must be greater than zero".to_string());
        }
        let resource_type = ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == self.get("Type"))
            .unwrap_or(ResourceType::W2Internal);
        Ok(CreateResource {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            resource_type,
            lcat_id: LcatId::new(lcat),
            contract_id: None,
            hourly_rate,
            annual_salary: optional_amount(self.get("Annual salary"), "Annual salary")?,
            start_date: date(self.get("Start date"), "Start date")?,
            fixed_price_amount: None,
            fixed_price_hours: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const TODAY: OffsetDateTime = datetime!(2025-06-01 00:00:00 UTC);

    fn set(form: &mut FormState, label: &str, value: &str) {
        let field = form.fields.iter_mut().find(|f| f.label == label).unwrap();
        field.input = TextInput::with_value(value);
    }

    fn pick(form: &mut FormState, label: &str, index: usize) {
        let field = form.fields.iter_mut().find(|f| f.label == label).unwrap();
        field.selected = index;
    }

    fn lcat() -> Lcat {
        Lcat {
            id: LcatId::new("l-1"),
            name: "Program Manager".to_string(),
            description: String::new(),
            current_published_rate: Some(dec!(185)),
            current_default_bill_rate: Some(dec!(175)),
            position_titles: vec![],
            is_active: true,
            created_date: TODAY,
            modified_date: None,
        }
    }

    #[test]
    fn amounts_accept_currency_formatting() {
        assert_eq!(parse_amount("$1,250,000"), Some(dec!(1250000)));
        assert_eq!(parse_amount(" 45.5% "), Some(dec!(45.5)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn contract_needs_number_and_name() {
        let form = FormState::new_contract(TODAY);
        assert_eq!(form.validate(), Err("Contract number is required".to_string()));
    }

    #[test]
    fn contract_funding_cannot_exceed_total() {
        let mut form = FormState::new_contract(TODAY);
        set(&mut form, "Contract number", "W91-25-C-0001");
        set(&mut form, "Contract name", "Readiness");
        set(&mut form, "Total value", "100000");
        set(&mut form, "Funded value", "150000");
        assert_eq!(
            form.validate(),
            Err("Funded value cannot exceed total value".to_string())
        );

        set(&mut form, "Funded value", "$50,000");
        let Ok(FormSubmission::CreateContract(contract)) = form.validate() else {
            panic!("expected a contract");
        };
        assert_eq!(contract.funded_value, dec!(50000));
        assert_eq!(contract.contract_type, ContractType::TimeAndMaterials);
        assert!(contract.is_prime);
        assert_eq!(contract.end_date, datetime!(2026-06-01 00:00:00 UTC));
    }

    #[test]
    fn contract_end_must_follow_start() {
        let mut form = FormState::new_contract(TODAY);
        set(&mut form, "Contract number", "N-1");
        set(&mut form, "Contract name", "Portal");
        set(&mut form, "End date", "2025-06-01");
        assert_eq!(
            form.validate(),
            Err("End date must be after start date".to_string())
        );
    }

    #[test]
    fn resource_requires_lcat_and_positive_rate() {
        let mut form = FormState::new_resource(&[lcat()], TODAY);
        set(&mut form, "First name", "Dana");
        set(&mut form, "Last name", "Reyes");
        set(&mut form, "Email", "dana@example.com");
        set(&mut form, "Hourly rate", "60");
        assert_eq!(form.validate(), Err("Please select an LCAT".to_string()));

        pick(&mut form, "LCAT", 1);
        set(&mut form, "Hourly rate", "0");
        assert_eq!(
            form.validate(),
            Err("Hourly rate must be greater than zero".to_string())
        );

        set(&mut form, "Hourly rate", "60");
        pick(&mut form, "Type", 2);
        let Ok(FormSubmission::CreateResource(resource)) = form.validate() else {
            panic!("expected a resource");
        };
        assert_eq!(resource.lcat_id.as_str(), "l-1");
        assert_eq!(resource.resource_type, ResourceType::Contractor1099);
    }

    #[test]
    fn funding_update_needs_modification_number() {
        let contract_form = FormState {
            kind: FormKind::UpdateFunding(ContractId::new("c-1")),
            title: String::new(),
            fields: vec![
                FormField::text("Modification #", ""),
                FormField::text("Funded amount", "1000"),
                FormField::text("Justification", ""),
            ],
            focused: 0,
            error: None,
        };
        assert_eq!(
            contract_form.validate(),
            Err("Modification number is required".to_string())
        );
    }

    #[test]
    fn allocation_must_be_between_one_and_hundred() {
        let contract = {
            let mut c = CreateContract::draft(TODAY);
            c.contract_number = "C-1".to_string();
            c
        };
        let contract = Contract {
            id: ContractId::new("c-1"),
            contract_number: contract.contract_number,
            contract_name: String::new(),
            customer_name: String::new(),
            prime_contractor: String::new(),
            is_prime: true,
            contract_type: contract.contract_type,
            start_date: contract.start_date,
            end_date: contract.end_date,
            total_value: dec!(100),
            funded_value: dec!(100),
            standard_full_time_hours: contract.standard_full_time_hours,
            description: None,
            status: govcon::domain::ContractStatus::Active,
            created_at: TODAY,
            updated_at: TODAY,
            is_active: true,
        };
        let available = ResourceAvailability {
            resource_id: ResourceId::new("r-1"),
            resource_name: "Dana Reyes".to_string(),
            current_allocation: dec!(25),
            available_allocation: dec!(75),
            is_fully_allocated: false,
            is_on_bench: false,
            current_contracts: vec![],
        };
        let mut form = FormState::assign_resource(&contract, &[available], TODAY);
        assert_eq!(form.validate(), Err("Please select a resource".to_string()));
        assert_eq!(form.fields[0].choices[1].0, "Dana Reyes (75% free)");

        form.move_horizontal(true);
        for bad in ["0", "101", "-5"] {
            set(&mut form, "Allocation %", bad);
            assert_eq!(
                form.validate(),
                Err("Allocation must be between 1 and 100".to_string())
            );
        }
        set(&mut form, "Allocation %", "40");
        let Ok(FormSubmission::AssignResource(_, assignment)) = form.validate() else {
            panic!("expected an assignment");
        };
        assert_eq!(assignment.allocation_percentage, dec!(40));
        assert_eq!(assignment.annual_hours, dec!(1912));
        assert_eq!(assignment.end_date, None);
    }

    #[test]
    fn termination_date_must_parse() {
        let form = FormState {
            kind: FormKind::TerminateResource(ResourceId::new("r-1")),
            title: String::new(),
            fields: vec![FormField::text("End date", "06/30/2025")],
            focused: 0,
            error: None,
        };
        assert_eq!(
            form.validate(),
            Err("End date must be a date (YYYY-MM-DD)".to_string())
        );
    }

    #[test]
    fn choice_fields_ignore_typing_and_cycle() {
        let mut form = FormState::new_contract(TODAY);
        form.focused = 5;
        form.input_char('x');
        assert_eq!(form.fields[5].display(), "T&M");
        form.move_horizontal(true);
        assert_eq!(form.fields[5].display(), "Cost Plus");
        form.move_horizontal(false);
        form.move_horizontal(false);
        assert_eq!(form.fields[5].display(), "Fixed Price");
    }
}
