//! Placeholder data loaded by the seed route

use uuid::{Uuid, uuid};

pub struct UserFixture {
    pub id: Uuid,
    pub name: &'static str,
    pub email: &'static str,
    /// Plaintext; hashed before it is stored
    pub password: &'static str,
}

pub struct CustomerFixture {
    pub id: Uuid,
    pub name: &'static str,
    pub email: &'static str,
    pub image_url: &'static str,
}

pub struct InvoiceFixture {
    pub customer_id: Uuid,
    pub amount: i64,
    pub status: &'static str,
    /// `YYYY-MM-DD`
    pub date: &'static str,
}

pub struct RevenueFixture {
    pub month: &'static str,
    pub revenue: i32,
}

pub const USERS: &[UserFixture] = &[UserFixture {
    id: uuid!("410544b2-4001-4271-9855-fec4b6a6442a"),
    name: "User",
    email: "user@nextmail.com",
    password: "123456",
}];

const EVIL_RABBIT: Uuid = uuid!("d6e15727-9fe1-4961-8c5b-ea44a9bd81aa");
const DELBA: Uuid = uuid!("3958dc9e-712f-4377-85e9-fec4b6a6442a");
const LEE: Uuid = uuid!("3958dc9e-742f-4377-85e9-fec4b6a6442a");
const MICHAEL: Uuid = uuid!("76d65c26-f784-44a2-ac19-586678f7c2f2");
const AMY: Uuid = uuid!("cc27c14a-0acf-4f4a-a6c9-d45682c144b9");
const BALAZS: Uuid = uuid!("13d07535-c59e-4157-a011-f8d2ef4e0cbb");

pub const CUSTOMERS: &[CustomerFixture] = &[
    CustomerFixture {
        id: EVIL_RABBIT,
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/customers/evil-rabbit.png",
    },
    CustomerFixture {
        id: DELBA,
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/customers/delba-de-oliveira.png",
    },
    CustomerFixture {
        id: LEE,
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/customers/lee-robinson.png",
    },
    CustomerFixture {
        id: MICHAEL,
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/customers/michael-novotny.png",
    },
    CustomerFixture {
        id: AMY,
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/customers/amy-burns.png",
    },
    CustomerFixture {
        id: BALAZS,
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/customers/balazs-orban.png",
    },
];

const fn invoice(
    customer_id: Uuid,
    amount: i64,
    status: &'static str,
    date: &'static str,
) -> InvoiceFixture {
    InvoiceFixture {
        customer_id,
        amount,
        status,
        date,
    }
}

pub const INVOICES: &[InvoiceFixture] = &[
    invoice(EVIL_RABBIT, 15795, "pending", "2022-12-06"),
    invoice(DELBA, 20348, "pending", "2022-11-14"),
    invoice(AMY, 3040, "paid", "2022-10-29"),
    invoice(MICHAEL, 44800, "paid", "2023-09-10"),
    invoice(BALAZS, 34577, "pending", "2023-08-05"),
    invoice(LEE, 54246, "pending", "2023-07-16"),
    invoice(EVIL_RABBIT, 666, "pending", "2023-06-27"),
    invoice(MICHAEL, 32545, "paid", "2023-06-09"),
    invoice(AMY, 1250, "paid", "2023-06-17"),
    invoice(BALAZS, 8546, "paid", "2023-06-07"),
    invoice(DELBA, 500, "paid", "2023-08-19"),
    invoice(BALAZS, 8945, "paid", "2023-06-03"),
    invoice(LEE, 1000, "paid", "2022-06-05"),
];

pub const REVENUE: &[RevenueFixture] = &[
    RevenueFixture { month: "Jan", revenue: 2000 },
    RevenueFixture { month: "Feb", revenue: 1800 },
    RevenueFixture { month: "Mar", revenue: 2200 },
    RevenueFixture { month: "Apr", revenue: 2500 },
    RevenueFixture { month: "May", revenue: 2300 },
    RevenueFixture { month: "Jun", revenue: 3200 },
    RevenueFixture { month: "Jul", revenue: 3500 },
    RevenueFixture { month: "Aug", revenue: 3700 },
    RevenueFixture { month: "Sep", revenue: 2500 },
    RevenueFixture { month: "Oct", revenue: 2800 },
    RevenueFixture { month: "Nov", revenue: 3000 },
    RevenueFixture { month: "Dec", revenue: 4800 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invoices_reference_known_customers() {
        let ids: HashSet<Uuid> = CUSTOMERS.iter().map(|c| c.id).collect();
        assert!(INVOICES.iter().all(|i| ids.contains(&i.customer_id)));
    }

    #[test]
    fn test_revenue_months_fit_column() {
        let months: HashSet<&str> = REVENUE.iter().map(|r| r.month).collect();
        assert_eq!(months.len(), REVENUE.len());
        assert!(REVENUE.iter().all(|r| r.month.len() <= 4));
    }

    #[test]
    fn test_invoice_fixtures_are_valid() {
        assert!(INVOICES.iter().all(|i| i.amount > 0));
        assert!(INVOICES.iter().all(|i| i.status == "pending" || i.status == "paid"));
    }
}
