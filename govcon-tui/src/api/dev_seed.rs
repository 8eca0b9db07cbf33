use govcon::domain::{
    burdened_cost, margin, Contract, ContractId, ContractStatus, ContractType, Lcat, LcatId,
    Resource, ResourceId, ResourceType, DEFAULT_FULL_TIME_HOURS,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{Duration, OffsetDateTime};

use super::dev_backend::DevStore;

/// A small, realistic portfolio: one contract of every status and warning
/// level, an underwater resource, a benched resource and one without a bill rate.
pub(super) fn seed_store(now: OffsetDateTime) -> DevStore {
    let mut store = DevStore::empty(now);

    let categories = [
        ("l-1", "Program Manager", Some(dec!(185)), Some(dec!(175)), &["Program Manager", "PM"][..]),
        ("l-2", "Senior Systems Engineer", Some(dec!(160)), Some(dec!(150)), &["Systems Engineer III"][..]),
        ("l-3", "Software Developer II", Some(dec!(125)), Some(dec!(118)), &["Developer"][..]),
        ("l-4", "Data Analyst I", Some(dec!(90)), None, &["Analyst"][..]),
    ];
    store.lcats = categories
        .into_iter()
        .map(|(id, name, published, bill, titles)| lcat(id, name, published, bill, titles, now))
        .collect();

    let people = [
        ("r-1", "Dana", "Reyes", ResourceType::W2Internal, "l-1", dec!(60)),
        ("r-2", "Marcus", "Chen", ResourceType::W2Internal, "l-2", dec!(70)),
        ("r-3", "Priya", "Natarajan", ResourceType::Subcontractor, "l-2", dec!(95)),
        ("r-4", "Tom", "Okafor", ResourceType::Contractor1099, "l-3", dec!(80)),
        ("r-5", "Lena", "Fischer", ResourceType::W2Internal, "l-3", dec!(45)),
        ("r-6", "Sam", "Ortiz", ResourceType::FixedPrice, "l-4", dec!(40)),
        ("r-7", "Alex", "Kim", ResourceType::W2Internal, "l-3", dec!(52)),
    ];
    for (id, first, last, kind, lcat_id, rate) in people {
        let resource = resource(&store, id, first, last, kind, lcat_id, rate, now);
        store.resources.push(resource);
    }
    if let Some(alex) = store.resources.iter_mut().find(|r| r.id.as_str() == "r-7") {
        alex.is_active = false;
        alex.end_date = Some(now - Duration::days(20));
    }

    store.contracts = vec![
        contract(
            "c-1",
            "W91CRB-24-C-0012",
            "Logistics Modernization",
            "U.S. Army",
            None,
            ContractType::TimeAndMaterials,
            ContractStatus::Active,
            (now - Duration::days(300), now + Duration::days(200)),
            (dec!(2400000), dec!(1200000)),
            now,
        ),
        contract(
            "c-2",
            "FA8650-23-D-1104",
            "Sensor Data Analytics",
            "U.S. Air Force",
            Some("Northrop Grumman"),
            ContractType::CostPlus,
            ContractStatus::Active,
            (now - Duration::days(500), now + Duration::days(45)),
            (dec!(1500000), dec!(250000)),
            now,
        ),
        contract(
            "c-3",
            "N00024-25-C-5521",
            "Fleet Readiness Portal",
            "NAVSEA",
            None,
            ContractType::FixedPrice,
            ContractStatus::Active,
            (now - Duration::days(60), now + Duration::days(700)),
            (dec!(900000), dec!(800000)),
            now,
        ),
        contract(
            "c-4",
            "HHSN-24-F-0042",
            "Grants Data Platform",
            "HHS",
            None,
            ContractType::LaborHourOnly,
            ContractStatus::Draft,
            (now + Duration::days(30), now + Duration::days(395)),
            (dec!(600000), Decimal::ZERO),
            now,
        ),
        contract(
            "c-5",
            "GS-35F-0119Y",
            "Help Desk Support",
            "GSA",
            None,
            ContractType::TimeAndMaterials,
            ContractStatus::Closed,
            (now - Duration::days(800), now - Duration::days(35)),
            (dec!(400000), dec!(400000)),
            now,
        ),
    ];
    for (id, burned) in [
        ("c-1", dec!(900000)),
        ("c-2", dec!(210000)),
        ("c-3", dec!(120000)),
        ("c-5", dec!(398500)),
    ] {
        store.burned.insert(ContractId::new(id), burned);
    }

    let assignments = [
        ("c-1", "r-1", dec!(50)),
        ("c-1", "r-2", dec!(100)),
        ("c-1", "r-4", dec!(60)),
        ("c-2", "r-3", dec!(75)),
        ("c-2", "r-5", dec!(40)),
        ("c-3", "r-5", dec!(40)),
        ("c-3", "r-1", dec!(25)),
    ];
    for (contract_id, resource_id, allocation) in assignments {
        let contract_id = ContractId::new(contract_id);
        let resource_id = ResourceId::new(resource_id);
        let start = now - Duration::days(45);
        if let Ok(assignment) = store.build_assignment(
            &contract_id,
            &resource_id,
            allocation,
            DEFAULT_FULL_TIME_HOURS,
            start,
            None,
        ) {
            store.assignments.push(assignment);
        }
        store.link_resource(&resource_id, &contract_id);
    }

    store
}

fn lcat(
    id: &str,
    name: &str,
    published: Option<Decimal>,
    bill: Option<Decimal>,
    titles: &[&str],
    now: OffsetDateTime,
) -> Lcat {
    Lcat {
        id: LcatId::new(id),
        name: name.to_string(),
        description: String::new(),
        current_published_rate: published,
        current_default_bill_rate: bill,
        position_titles: titles.iter().map(|t| t.to_string()).collect(),
        is_active: true,
        created_date: now - Duration::days(400),
        modified_date: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn resource(
    store: &DevStore,
    id: &str,
    first: &str,
    last: &str,
    kind: ResourceType,
    lcat_id: &str,
    hourly_rate: Decimal,
    now: OffsetDateTime,
) -> Resource {
    let lcat = store.lcats.iter().find(|l| l.id.as_str() == lcat_id);
    let bill_rate = lcat.and_then(|l| l.current_default_bill_rate);
    let burdened = burdened_cost(hourly_rate, kind);
    Resource {
        id: ResourceId::new(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        full_name: format!("{} {}", first, last),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        resource_type: kind,
        lcat_id: LcatId::new(lcat_id),
        lcat_name: lcat.map(|l| l.name.clone()),
        contract_id: None,
        contract_name: None,
        hourly_rate,
        annual_salary: None,
        burdened_cost: burdened,
        bill_rate,
        margin: margin(bill_rate, burdened),
        start_date: now - Duration::days(365),
        end_date: None,
        is_active: true,
        created_date: Some(now - Duration::days(365)),
        created_by: Some("seed".to_string()),
        fixed_price_amount: None,
        fixed_price_hours: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn contract(
    id: &str,
    number: &str,
    name: &str,
    customer: &str,
    prime_contractor: Option<&str>,
    contract_type: ContractType,
    status: ContractStatus,
    (start_date, end_date): (OffsetDateTime, OffsetDateTime),
    (total_value, funded_value): (Decimal, Decimal),
    now: OffsetDateTime,
) -> Contract {
    Contract {
        id: ContractId::new(id),
        contract_number: number.to_string(),
        contract_name: name.to_string(),
        customer_name: customer.to_string(),
        prime_contractor: prime_contractor.unwrap_or("").to_string(),
        is_prime: prime_contractor.is_none(),
        contract_type,
        start_date,
        end_date,
        total_value,
        funded_value,
        standard_full_time_hours: DEFAULT_FULL_TIME_HOURS,
        description: None,
        status,
        created_at: start_date - Duration::days(14),
        updated_at: now,
        is_active: status != ContractStatus::Closed,
    }
}
