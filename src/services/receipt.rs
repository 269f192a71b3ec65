//! Receipt page: the page that opens the bank's payment popup for an order.

use maud::{Markup, PreEscaped};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::logging::{mask_email, mask_phone};
use crate::orders::Order;
use crate::payments::providers::RaiffeisenProvider;
use crate::payments::types::{
    PopupPaymentParams, Receipt, ReceiptCustomer, ReceiptItem, DEFAULT_VAT_TYPE,
};

/// How the SDK ends up in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkScript {
    /// Script source downloaded from the bank, inlined verbatim.
    Inline(String),
    /// Download failed; the browser loads it from this URL instead.
    External(String),
}

pub struct ReceiptService {
    provider: Arc<RaiffeisenProvider>,
    urls: StoreConfig,
    public_key: String,
}

impl ReceiptService {
    pub fn new(provider: Arc<RaiffeisenProvider>, urls: StoreConfig, public_key: String) -> Self {
        Self {
            provider,
            urls,
            public_key,
        }
    }

    pub async fn render(&self, order: &Order) -> String {
        let sdk = match self.provider.fetch_sdk_script().await {
            Ok(script) => SdkScript::Inline(script),
            Err(e) => {
                warn!(
                    order_id = %order.id,
                    error = %e,
                    "payment SDK download failed, linking it instead"
                );
                SdkScript::External(self.provider.sdk_url().to_string())
            }
        };

        debug!(
            order_id = %order.id,
            email = %mask_email(&order.billing.email),
            phone = %mask_phone(&order.billing.phone),
            "rendering receipt page"
        );
        render_receipt_page(order, &self.public_key, &self.urls, &sdk).into_string()
    }
}

pub fn build_popup_params(order: &Order, public_key: &str, urls: &StoreConfig) -> PopupPaymentParams {
    let processing_url = urls.success_processing_url(order.id);
    let items = order
        .items
        .iter()
        .map(|item| ReceiptItem {
            name: item.name.clone(),
            price: item.unit_price,
            quantity: item.quantity,
            amount: item.line_total,
            vat_type: DEFAULT_VAT_TYPE.to_string(),
        })
        .collect();

    PopupPaymentParams {
        public_id: public_key.to_string(),
        amount: order.total,
        order_id: order.id.to_string(),
        success_url: processing_url.clone(),
        fail_url: processing_url,
        comment: format!("Оплата заказа {}", order.id),
        receipt: Receipt {
            receipt_number: order.id.to_string(),
            customer: ReceiptCustomer {
                email: order.billing.email.clone(),
                phone: order.billing.phone.clone(),
                name: order.billing.receipt_name(),
            },
            items,
        },
    }
}

pub fn render_receipt_page(
    order: &Order,
    public_key: &str,
    urls: &StoreConfig,
    sdk: &SdkScript,
) -> Markup {
    let params = build_popup_params(order, public_key, urls);
    let processing_url = urls.success_processing_url(order.id);
    let popup_script = format!(
        r#"
(function () {{
    var publicKey = {public_key};
    var params = {params};
    var processingUrl = {processing_url};

    var pay = function () {{
        var paymentPage = new PaymentPageSdk(publicKey, {{}});

        paymentPage.openPopup(params)
            .then(function (data) {{
                console.log("success", data);
                document.location.href = processingUrl;
            }})
            .catch(function (error) {{
                console.log("fail", error);
                document.location.href = processingUrl;
            }});
    }};

    pay();

    document.getElementById("submit_raiffeisen_payment_form").addEventListener("click", function (event) {{
        event.preventDefault();
        pay();
    }});
}})();
"#,
        public_key = script_json(public_key),
        params = script_json(&params),
        processing_url = script_json(&processing_url),
    );

    maud::html! {
        (maud::DOCTYPE)
        html lang="ru" {
            head {
                meta charset="utf-8";
                title { "Оплата заказа " (order.id.to_string()) }
            }
            body {
                form #raiffeisen_payment_form action="" method="post" target="_top" {
                    div.payment_buttons {
                        input.button.alt #submit_raiffeisen_payment_form type="submit" value="Оплатить";
                        a.button.cancel href=(urls.cancel_order_url(order.id)) { "Отменить заказ" }
                    }
                }
                @match sdk {
                    SdkScript::Inline(source) => {
                        script { (PreEscaped(source)) }
                    }
                    SdkScript::External(url) => {
                        script src=(url) {}
                    }
                }
                script { (PreEscaped(popup_script)) }
            }
        }
    }
}

/// JSON literal safe to place inside an inline `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}
