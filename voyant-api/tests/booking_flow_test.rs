mod common;

use chrono::NaiveDate;
use common::{customer_json, harness, Harness};
use serde_json::json;
use voyant_api::{NavigationOutcome, Route};
use voyant_catalog::{Car, NewReview, ProductType};
use voyant_core::{Passenger, PaymentMethod};
use voyant_order::{
    BookingDraft, BookingWizard, CarFlow, CardDetails, NavigationState, PaymentStep, PaymentStepState,
    ReceiptView, WizardError, WizardStep,
};
use voyant_shared::Masked;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn signed_in() -> Harness {
    let h = harness(&[("access_token", "a1"), ("refresh_token", "r1")]).await;
    Mock::given(method("GET"))
        .and(path("/users/auth/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(customer_json()))
        .mount(&h.server)
        .await;
    h.storefront.auth.bootstrap().await;
    h
}

fn car() -> Car {
    serde_json::from_value(json!({
        "id": 7,
        "make": "Toyota",
        "model": "RAV4",
        "location": "Nairobi Airport",
        "daily_rate": "50.00"
    }))
    .unwrap()
}

fn car_wizard() -> BookingWizard<CarFlow> {
    let draft = BookingDraft::new("7", "Toyota RAV4")
        .with_dates(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 13).unwrap(),
        )
        .with_passenger(Passenger::new("Alan Turing", "alan@example.com"));
    BookingWizard::new(CarFlow { car: car() }, draft)
}

fn card() -> CardDetails {
    CardDetails {
        number: Masked::from("4242424242424242"),
        holder_name: "Alan Turing".to_string(),
        expiry: Masked::from("12/30"),
        cvv: Masked::from("123"),
    }
}

#[tokio::test]
async fn test_car_booking_through_receipt() {
    let h = signed_in().await;

    Mock::given(method("POST"))
        .and(path("/booking/bookings/"))
        .and(header("authorization", "Bearer a1"))
        .and(body_partial_json(json!({
            "booking_type": "CAR",
            "item_id": "7",
            "total_price": "150.00",
            "rental_days": 3,
            "pickup_location": "Nairobi Airport"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "status": "PENDING",
            "booking_type": "CAR",
            "total_price": "150.00",
            "item_name": "Toyota RAV4",
            "start_date": "2024-06-10",
            "end_date": "2024-06-13",
            "driver": {"name": "Alan Turing", "email": "alan@example.com"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/payments/"))
        .and(body_partial_json(json!({
            "booking_id": "12",
            "amount": "150.00",
            "payment_method": "CARD"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30,
            "transaction_id": "MOCK-77",
            "amount": "150.00",
            "status": "COMPLETED",
            "payment_method": "CARD"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut wizard = car_wizard();
    let quote = wizard.next().unwrap();
    assert_eq!(quote.formatted_total(), "$150.00");

    let booking = wizard.submit(&h.storefront.bookings).await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Completed);

    let mut nav = h.storefront.navigator();
    let outcome = nav.navigate_with_state(Route::Payment, NavigationState::for_payment(booking));
    assert_eq!(outcome, NavigationOutcome::Rendered(Route::Payment));

    let mut payment = PaymentStep::from_navigation(nav.state());
    assert_eq!(payment.state(), PaymentStepState::Ready);
    assert_eq!(payment.amount_due().as_deref(), Some("$150.00"));
    payment.select_method(PaymentMethod::Card);
    payment.set_card(card());

    let receipt_state = payment.submit(&h.storefront.payments).await.unwrap();
    assert_eq!(payment.state(), PaymentStepState::Paid);
    nav.navigate_with_state(Route::Receipt, receipt_state);

    match ReceiptView::from_navigation(nav.state()) {
        ReceiptView::Receipt(model) => {
            assert_eq!(model.booking_reference, "#12");
            assert_eq!(model.total, "$150.00");
            assert_eq!(model.transaction_id, "MOCK-77");
            assert_eq!(model.card_hint.as_deref(), Some("**** 4242"));
            assert_eq!(model.customer.name, "Alan Turing");
        }
        other => panic!("expected a receipt, got {:?}", other),
    }

    // Reloading the receipt loses the navigation state.
    nav.reload();
    assert!(ReceiptView::from_navigation(nav.state()).is_fallback());
}

#[tokio::test]
async fn test_rejected_booking_keeps_wizard_on_review() {
    let h = signed_in().await;

    Mock::given(method("POST"))
        .and(path("/booking/bookings/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Car already booked for these dates"})),
        )
        .mount(&h.server)
        .await;

    let mut wizard = car_wizard();
    wizard.next().unwrap();
    let err = wizard.submit(&h.storefront.bookings).await.unwrap_err();

    assert_eq!(err, WizardError::Submission("Car already booked for these dates".to_string()));
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.error(), Some("Car already booked for these dates"));
    assert_eq!(wizard.draft().passengers.len(), 1);
}

#[tokio::test]
async fn test_booking_with_expired_session_redirects_to_login() {
    let h = signed_in().await;

    Mock::given(method("POST"))
        .and(path("/booking/bookings/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut wizard = car_wizard();
    wizard.next().unwrap();
    let err = wizard.submit(&h.storefront.bookings).await.unwrap_err();
    assert_eq!(err, WizardError::SessionExpired);

    let mut nav = h.storefront.navigator();
    let outcome = nav.navigate("/payment");
    assert_eq!(
        outcome,
        NavigationOutcome::Redirected {
            from: Route::Payment,
            to: Route::Login
        }
    );
}

#[tokio::test]
async fn test_direct_payment_visit_is_invalid() {
    let h = signed_in().await;
    let mut nav = h.storefront.navigator();
    assert_eq!(nav.navigate("/payment"), NavigationOutcome::Rendered(Route::Payment));

    let mut payment = PaymentStep::from_navigation(nav.state());
    assert_eq!(payment.state(), PaymentStepState::InvalidBooking);
    assert!(payment.submit(&h.storefront.payments).await.is_err());
    assert!(h
        .server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .all(|r| r.url.path() != "/payments/"));
}

#[tokio::test]
async fn test_customer_cannot_open_admin() {
    let h = signed_in().await;
    let mut nav = h.storefront.navigator();
    assert_eq!(
        nav.navigate("/admin"),
        NavigationOutcome::Redirected {
            from: Route::Admin,
            to: Route::Unauthorized
        }
    );
}

#[tokio::test]
async fn test_review_upload_is_multipart() {
    let h = signed_in().await;

    Mock::given(method("POST"))
        .and(path("/reviews/"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "rating": 5, "comment": "Spotless"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let review = NewReview {
        product_type: ProductType::Car,
        item_id: "7".to_string(),
        rating: 5,
        comment: "Spotless".to_string(),
        image: None,
    };
    let created = h.storefront.reviews.create(&review).await.unwrap();
    assert_eq!(created.rating, 5);

    let requests = h.server.received_requests().await.unwrap();
    let upload = requests.iter().find(|r| r.url.path() == "/reviews/").unwrap();
    let content_type = upload
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_invalid_review_never_hits_network() {
    let h = signed_in().await;
    let review = NewReview {
        product_type: ProductType::Hotel,
        item_id: "2".to_string(),
        rating: 9,
        comment: "?".to_string(),
        image: None,
    };
    assert!(h.storefront.reviews.create(&review).await.is_err());
    assert!(h
        .server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .all(|r| r.url.path() != "/reviews/"));
}

#[tokio::test]
async fn test_organizer_earnings_use_package_commission() {
    let h = harness(&[("access_token", "a1"), ("refresh_token", "r1")]).await;

    Mock::given(method("GET"))
        .and(path("/catalog/packages/mine/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Serengeti Safari", "price": "1000.00", "commission_rate": 10.0}
        ])))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/booking/bookings/organizer/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status": "CONFIRMED", "total": "1000.00", "item_name": "Serengeti Safari"},
            {"id": 2, "status": "CONFIRMED", "total": "2000.00", "item_name": "Serengeti Safari"},
            {"id": 3, "status": "PENDING", "total": "1000.00", "item_name": "Serengeti Safari"}
        ])))
        .mount(&h.server)
        .await;

    let earnings = h.storefront.organizer_earnings().await.unwrap();
    assert_eq!(earnings.formatted_commission(), "$300.00");
    assert_eq!(earnings.pending_bookings, 1);
}
