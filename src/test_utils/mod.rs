#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod response;
pub(crate) mod store;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use response::{
    assert_hx_redirect, assert_status_ok, assert_valid_html, element_texts, parse_html_document,
    parse_html_fragment,
};
pub(crate) use store::{FailingStore, Operation, local_test_ledger, shared_test_ledger, test_ledger};
