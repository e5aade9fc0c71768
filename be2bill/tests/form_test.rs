//! Golden outputs of the hosted payment page buttons.

use be2bill::{
    FormClient,
    amount::{Amount, FragmentedAmount, SingleAmount},
    form::HtmlOptions,
    params::Params,
};

const ORDER_ID: &str = "order_1412327697";
const CLIENT_ID: &str = "6328_john.smith@example.org";
const DESCRIPTION: &str = "Fashion jacket";

fn client() -> FormClient {
    FormClient::sandbox("test", "password")
}

fn styled() -> HtmlOptions {
    HtmlOptions::new()
        .with_submit_attribute("value", "Pay with be2bill")
        .with_submit_attribute("class", "flatButton")
        .with_form_attribute("id", "myform")
}

fn extra_params() -> Params {
    Params::new().with("CLIENTEMAIL", "toto@example.org").with("3DSECURE", "yes")
}

#[test]
fn test_payment_button_complete() {
    let schedule =
        FragmentedAmount::from_iso_dates([("2010-05-14", 15235), ("2012-06-04", 14723)]).unwrap();

    let button = client().build_payment_form_button(
        &Amount::Fragmented(schedule),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &styled(),
        extra_params(),
    );

    let expected = r#"<form method="post" action="https://secure-test.be2bill.com/front/form/process" id="myform">
  <input type="hidden" name="3DSECURE" value="yes" />
  <input type="hidden" name="AMOUNTS[2010-05-14]" value="15235" />
  <input type="hidden" name="AMOUNTS[2012-06-04]" value="14723" />
  <input type="hidden" name="CLIENTEMAIL" value="toto@example.org" />
  <input type="hidden" name="CLIENTIDENT" value="6328_john.smith@example.org" />
  <input type="hidden" name="DESCRIPTION" value="Fashion jacket" />
  <input type="hidden" name="HASH" value="e4e3c4ab88774536108b85ccd62735bf1c1a6825a87d0fcbd7efa2ece12670e2" />
  <input type="hidden" name="IDENTIFIER" value="test" />
  <input type="hidden" name="OPERATIONTYPE" value="payment" />
  <input type="hidden" name="ORDERID" value="order_1412327697" />
  <input type="hidden" name="VERSION" value="2.0" />
  <input type="submit" class="flatButton" value="Pay with be2bill" />
</form>"#;
    assert_eq!(button, expected);
}

#[test]
fn test_payment_button_simple() {
    let button = client().build_payment_form_button(
        &Amount::Single(SingleAmount(15235)),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &HtmlOptions::new(),
        Params::new(),
    );

    let expected = r#"<form method="post" action="https://secure-test.be2bill.com/front/form/process">
  <input type="hidden" name="AMOUNT" value="15235" />
  <input type="hidden" name="CLIENTIDENT" value="6328_john.smith@example.org" />
  <input type="hidden" name="DESCRIPTION" value="Fashion jacket" />
  <input type="hidden" name="HASH" value="fab8f17da3e0f8315168cffc87c5cc28dbd29698c102d19e9f548bec42d16029" />
  <input type="hidden" name="IDENTIFIER" value="test" />
  <input type="hidden" name="OPERATIONTYPE" value="payment" />
  <input type="hidden" name="ORDERID" value="order_1412327697" />
  <input type="hidden" name="VERSION" value="2.0" />
  <input type="submit" />
</form>"#;
    assert_eq!(button, expected);
}

#[test]
fn test_authorization_button_complete() {
    let button = client().build_authorization_form_button(
        SingleAmount(15235),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &styled(),
        extra_params(),
    );

    let expected = r#"<form method="post" action="https://secure-test.be2bill.com/front/form/process" id="myform">
  <input type="hidden" name="3DSECURE" value="yes" />
  <input type="hidden" name="AMOUNT" value="15235" />
  <input type="hidden" name="CLIENTEMAIL" value="toto@example.org" />
  <input type="hidden" name="CLIENTIDENT" value="6328_john.smith@example.org" />
  <input type="hidden" name="DESCRIPTION" value="Fashion jacket" />
  <input type="hidden" name="HASH" value="5c22b8f55c84b21e6e6c213b8e4ef554779f785abee2ca8361096b6b0d95a9fd" />
  <input type="hidden" name="IDENTIFIER" value="test" />
  <input type="hidden" name="OPERATIONTYPE" value="authorization" />
  <input type="hidden" name="ORDERID" value="order_1412327697" />
  <input type="hidden" name="VERSION" value="2.0" />
  <input type="submit" class="flatButton" value="Pay with be2bill" />
</form>"#;
    assert_eq!(button, expected);
}

#[test]
fn test_authorization_button_simple() {
    let button = client().build_authorization_form_button(
        SingleAmount(15235),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &HtmlOptions::new(),
        Params::new(),
    );

    let expected = r#"<form method="post" action="https://secure-test.be2bill.com/front/form/process">
  <input type="hidden" name="AMOUNT" value="15235" />
  <input type="hidden" name="CLIENTIDENT" value="6328_john.smith@example.org" />
  <input type="hidden" name="DESCRIPTION" value="Fashion jacket" />
  <input type="hidden" name="HASH" value="01ccdb73b31de50567aa699642dad2e566a9c676d74d359efb4c849c13012427" />
  <input type="hidden" name="IDENTIFIER" value="test" />
  <input type="hidden" name="OPERATIONTYPE" value="authorization" />
  <input type="hidden" name="ORDERID" value="order_1412327697" />
  <input type="hidden" name="VERSION" value="2.0" />
  <input type="submit" />
</form>"#;
    assert_eq!(button, expected);
}

#[test]
fn test_html_options_from_nested_params() {
    let raw = Params::new()
        .with("SUBMIT", Params::new().with("value", "Pay with be2bill").with("class", "flatButton"))
        .with("FORM", Params::new().with("id", "myform"));

    let from_params = client().build_authorization_form_button(
        SingleAmount(15235),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &HtmlOptions::from_params(&raw),
        extra_params(),
    );
    let from_builder = client().build_authorization_form_button(
        SingleAmount(15235),
        ORDER_ID,
        CLIENT_ID,
        DESCRIPTION,
        &styled(),
        extra_params(),
    );

    assert_eq!(from_params, from_builder);
}
