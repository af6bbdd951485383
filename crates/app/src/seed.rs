//! Demo menus, rights and master data for the in-memory wiring.

use chrono::NaiveDate;

use transerp_auth::{MenuNode, MenuRight, Permissions};
use transerp_core::{MenuId, RecordId, UserId};
use transerp_masters::{CategoryType, City, Customer, Driver, Vehicle};
use transerp_metadata::Amount;

/// Full rights on every page.
pub const ADMIN: UserId = UserId::new(1);
/// Views drivers, raises invoices.
pub const CLERK: UserId = UserId::new(2);

pub const ROLES: [&str; 3] = ["Admin", "Dispatcher", "Accountant"];

pub fn menus() -> Vec<MenuNode> {
    vec![
        MenuNode::new(1, 0, "Masters").with_sequence(1),
        MenuNode::new(2, 1, "Drivers").with_url("/drivers").with_sequence(1),
        MenuNode::new(3, 1, "Vehicles").with_url("/vehicles").with_sequence(2),
        MenuNode::new(4, 1, "Customers").with_url("/customers").with_sequence(3),
        MenuNode::new(5, 1, "Companies").with_url("/companies").with_sequence(4),
        MenuNode::new(6, 1, "Cities").with_url("/cities").with_sequence(5),
        MenuNode::new(7, 1, "Students").with_url("/students").with_sequence(6),
        MenuNode::new(8, 1, "Users").with_url("/users").with_sequence(7),
        MenuNode::new(9, 1, "Categories").with_url("/categories").with_sequence(8),
        MenuNode::new(12, 1, "User Categories").with_url("/user-categories").with_sequence(9),
        MenuNode::new(10, 0, "Transactions").with_sequence(2),
        MenuNode::new(11, 10, "Invoices").with_url("/invoices").with_sequence(1),
        MenuNode::new(13, 10, "Student Attendance").with_url("/attendance").with_sequence(2),
        MenuNode::new(20, 0, "Administration").with_sequence(3),
        MenuNode::new(21, 20, "User Rights").with_url("/user-rights").with_sequence(1),
    ]
}

pub fn rights() -> Vec<MenuRight> {
    let mut rows: Vec<MenuRight> = menus()
        .into_iter()
        .filter(|m| m.url.is_some())
        .map(|m| MenuRight::new(ADMIN, m.id, Permissions::all()))
        .collect();

    rows.push(MenuRight::new(CLERK, MenuId::new(2), Permissions::view_only()));
    rows.push(MenuRight::new(
        CLERK,
        MenuId::new(11),
        Permissions {
            delete: false,
            verify: false,
            ..Permissions::all()
        },
    ));

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| row.with_id(i as i32 + 1))
        .collect()
}

pub fn drivers() -> Vec<Driver> {
    vec![
        Driver {
            id: RecordId::new(1),
            name: "Ravi Kumar".into(),
            mobile: "+91 98200 11111".into(),
            license_number: "MH1420110062821".into(),
            created_by: ADMIN,
            ..Driver::default()
        },
        Driver {
            id: RecordId::new(2),
            name: "Imran Shaikh".into(),
            mobile: "+91 98200 22222".into(),
            license_number: "MH0420150034512".into(),
            created_by: ADMIN,
            ..Driver::default()
        },
    ]
}

pub fn vehicles() -> Vec<Vehicle> {
    vec![Vehicle {
        id: RecordId::new(1),
        vehicle_number: "MH12AB1234".into(),
        vehicle_type: "Trailer".into(),
        capacity: Amount::from_minor(2_500),
        model_year: 2021,
        insurance_expiry: NaiveDate::from_ymd_opt(2026, 3, 31),
        ..Vehicle::default()
    }]
}

pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            customer_id: RecordId::new(1),
            customer_name: "Shree Logistics".into(),
            email: "accounts@shreelogistics.in".into(),
            phone_number: "+91 22 4000 1000".into(),
            ..Customer::default()
        },
        Customer {
            customer_id: RecordId::new(2),
            customer_name: "Deccan Cargo".into(),
            email: "billing@deccancargo.in".into(),
            phone_number: "+91 20 2600 2000".into(),
            ..Customer::default()
        },
    ]
}

pub fn cities() -> Vec<City> {
    [("Mumbai", "Maharashtra"), ("Pune", "Maharashtra"), ("Surat", "Gujarat")]
        .into_iter()
        .enumerate()
        .map(|(i, (city, state))| City {
            id: RecordId::new(i as i32 + 1),
            city_name: city.into(),
            state: state.into(),
            ..City::default()
        })
        .collect()
}

pub fn category_types() -> Vec<CategoryType> {
    ["Expense", "Income"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| CategoryType {
            cat_type_id: RecordId::new(i as i32 + 1),
            cat_type_name: name.into(),
        })
        .collect()
}
