//! Renders an N-time payment button for the sandbox hosted payment page.
//!
//! Run with: `cargo run --example form_button`

use be2bill::{
    FormClient,
    amount::{Amount, FragmentedAmount},
    form::HtmlOptions,
    params::Params,
};

fn main() -> be2bill::Result<()> {
    let client = FormClient::sandbox("test", "password");

    let schedule = FragmentedAmount::from_iso_dates([("2010-05-14", 15235), ("2012-06-04", 14723)])?;
    let button = client.build_payment_form_button(
        &Amount::Fragmented(schedule),
        "order_1412327697",
        "6328_john.smith@example.org",
        "Fashion jacket",
        &HtmlOptions::new()
            .with_form_attribute("id", "myform")
            .with_submit_attribute("value", "Pay with be2bill")
            .with_submit_attribute("class", "flatButton"),
        Params::new().with("CLIENTEMAIL", "toto@example.org").with("3DSECURE", "yes"),
    );

    println!("{button}");
    Ok(())
}
