//! Purchase flow state machine.
//!
//! A flow walks one product from color choice to a confirmed order. Each
//! [`FlowState`] variant carries exactly the data that is valid at that step,
//! so a flow can never hold, say, a fulfillment without store replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{available_store_ids, ReplyMap};
use crate::catalog::{CatalogRepository, Color, Product, Store};
use crate::checkout::{
    list_options, Fulfillment, FulfillmentForm, FulfillmentOption, OrderFulfillment,
    OrderSummary, PickupStore, StoreSelection, PICKUP_SUMMARY_ETA,
};
use crate::ids::{ColorId, FlowId, RequestId, StoreId};
use crate::search::{find_nearby_stores, DEFAULT_NEARBY_LIMIT};
use crate::CommerceError;

/// Steps in the purchase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Product page, nothing chosen yet.
    NoSelection,
    /// Color chosen, picking stores.
    ColorChosen,
    /// Stores chosen, ready to message them.
    StoresChosen,
    /// Waiting on store replies.
    RepliesPending,
    /// Replies in, picking fulfillment.
    RepliesReceived,
    /// Fulfillment chosen, ready to confirm.
    FulfillmentChosen,
    /// Order placed.
    OrderConfirmed,
}

impl FlowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::NoSelection => "no_selection",
            FlowStep::ColorChosen => "color_chosen",
            FlowStep::StoresChosen => "stores_chosen",
            FlowStep::RepliesPending => "replies_pending",
            FlowStep::RepliesReceived => "replies_received",
            FlowStep::FulfillmentChosen => "fulfillment_chosen",
            FlowStep::OrderConfirmed => "order_confirmed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlowStep::NoSelection => "Choose Color",
            FlowStep::ColorChosen => "Select Stores",
            FlowStep::StoresChosen => "Message Stores",
            FlowStep::RepliesPending => "Awaiting Replies",
            FlowStep::RepliesReceived => "Delivery Options",
            FlowStep::FulfillmentChosen => "Review",
            FlowStep::OrderConfirmed => "Confirmed",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            FlowStep::NoSelection => 1,
            FlowStep::ColorChosen => 2,
            FlowStep::StoresChosen => 3,
            FlowStep::RepliesPending => 4,
            FlowStep::RepliesReceived => 5,
            FlowStep::FulfillmentChosen => 6,
            FlowStep::OrderConfirmed => 7,
        }
    }

    /// Get progress percentage.
    pub fn progress_percent(&self) -> u8 {
        ((self.number() as f64 / 7.0) * 100.0) as u8
    }
}

/// Flow state, with the data valid at each step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum FlowState {
    NoSelection,
    ColorChosen {
        color: Color,
    },
    StoresChosen {
        color: Color,
        stores: StoreSelection,
    },
    RepliesPending {
        color: Color,
        stores: StoreSelection,
        request: RequestId,
    },
    RepliesReceived {
        color: Color,
        stores: StoreSelection,
        replies: ReplyMap,
    },
    FulfillmentChosen {
        color: Color,
        replies: ReplyMap,
        fulfillment: Fulfillment,
    },
    OrderConfirmed {
        order: OrderSummary,
    },
}

impl FlowState {
    pub fn step(&self) -> FlowStep {
        match self {
            FlowState::NoSelection => FlowStep::NoSelection,
            FlowState::ColorChosen { .. } => FlowStep::ColorChosen,
            FlowState::StoresChosen { .. } => FlowStep::StoresChosen,
            FlowState::RepliesPending { .. } => FlowStep::RepliesPending,
            FlowState::RepliesReceived { .. } => FlowStep::RepliesReceived,
            FlowState::FulfillmentChosen { .. } => FlowStep::FulfillmentChosen,
            FlowState::OrderConfirmed { .. } => FlowStep::OrderConfirmed,
        }
    }
}

/// One customer's purchase of one product.
///
/// Serializable so it can be handed from one screen to the next. A restored
/// flow is checked against its product the same way the transitions check
/// their input. Every transition either succeeds or leaves the state untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "PurchaseFlowRecord")]
pub struct PurchaseFlow {
    /// Unique flow identifier.
    pub id: FlowId,
    /// Product being purchased.
    pub product: Product,
    /// How many of the closest matching stores may be messaged.
    nearby_limit: usize,
    state: FlowState,
}

impl PurchaseFlow {
    /// Start a flow for a product.
    pub fn new(product: Product) -> Self {
        let id = FlowId::generate();
        tracing::debug!(flow = %id, product = %product.id, "started purchase flow");
        Self {
            id,
            product,
            nearby_limit: DEFAULT_NEARBY_LIMIT,
            state: FlowState::NoSelection,
        }
    }

    /// Offer the closest `limit` matching stores instead of the default.
    pub fn with_nearby_limit(mut self, limit: usize) -> Self {
        self.nearby_limit = limit;
        self
    }

    pub fn nearby_limit(&self) -> usize {
        self.nearby_limit
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn step(&self) -> FlowStep {
        self.state.step()
    }

    /// The chosen color, once there is one.
    pub fn color(&self) -> Option<&Color> {
        match &self.state {
            FlowState::NoSelection | FlowState::OrderConfirmed { .. } => None,
            FlowState::ColorChosen { color }
            | FlowState::StoresChosen { color, .. }
            | FlowState::RepliesPending { color, .. }
            | FlowState::RepliesReceived { color, .. }
            | FlowState::FulfillmentChosen { color, .. } => Some(color),
        }
    }

    /// Stores currently selected for messaging.
    pub fn selected_stores(&self) -> Option<&StoreSelection> {
        match &self.state {
            FlowState::StoresChosen { stores, .. }
            | FlowState::RepliesPending { stores, .. }
            | FlowState::RepliesReceived { stores, .. } => Some(stores),
            _ => None,
        }
    }

    /// Store replies, once received.
    pub fn replies(&self) -> Option<&ReplyMap> {
        match &self.state {
            FlowState::RepliesReceived { replies, .. }
            | FlowState::FulfillmentChosen { replies, .. } => Some(replies),
            _ => None,
        }
    }

    pub fn fulfillment(&self) -> Option<&Fulfillment> {
        match &self.state {
            FlowState::FulfillmentChosen { fulfillment, .. } => Some(fulfillment),
            _ => None,
        }
    }

    pub fn order(&self) -> Option<&OrderSummary> {
        match &self.state {
            FlowState::OrderConfirmed { order } => Some(order),
            _ => None,
        }
    }

    /// Stores that reported the product in stock, in id order.
    pub fn available_stores<'a, C>(&self, catalog: &'a C) -> Vec<&'a Store>
    where
        C: CatalogRepository + ?Sized,
    {
        self.replies()
            .map(|replies| {
                available_store_ids(replies)
                    .iter()
                    .filter_map(|id| catalog.store(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fulfillment options for the current replies.
    pub fn fulfillment_options<C>(&self, catalog: &C) -> Result<Vec<FulfillmentOption>, CommerceError>
    where
        C: CatalogRepository + ?Sized,
    {
        if self.replies().is_none() {
            return Err(self.rejected(FlowStep::RepliesReceived));
        }
        Ok(list_options(&self.available_stores(catalog)))
    }

    /// Choose the color to buy.
    pub fn choose_color(&mut self, id: &ColorId) -> Result<&Color, CommerceError> {
        if !matches!(self.state, FlowState::NoSelection | FlowState::ColorChosen { .. }) {
            return Err(self.rejected(FlowStep::ColorChosen));
        }
        let color = self.product.select_color(id).map_err(|e| {
            tracing::warn!(flow = %self.id, color = %id, error = %e, "color rejected");
            e
        })?;

        self.state = FlowState::ColorChosen {
            color: color.clone(),
        };
        Ok(color)
    }

    /// Add or remove a store from the selection.
    ///
    /// Only the nearby stores carrying the product's category can be picked.
    /// Returns the store evicted to make room, if any. Removing the last
    /// store goes back to [`FlowStep::ColorChosen`].
    pub fn toggle_store<C>(&mut self, catalog: &C, id: &StoreId) -> Result<Option<StoreId>, CommerceError>
    where
        C: CatalogRepository + ?Sized,
    {
        let (color, mut stores) = match &self.state {
            FlowState::ColorChosen { color } => (color.clone(), StoreSelection::new()),
            FlowState::StoresChosen { color, stores } => (color.clone(), stores.clone()),
            _ => return Err(self.rejected(FlowStep::StoresChosen)),
        };
        if catalog.store(id).is_none() {
            return Err(CommerceError::StoreNotFound(id.to_string()));
        }
        let offered = find_nearby_stores(catalog, &self.product.category, self.nearby_limit);
        if !offered.iter().any(|store| &store.id == id) {
            tracing::warn!(flow = %self.id, store = %id, category = %self.product.category, "store not offered");
            return Err(CommerceError::StoreNotNearby(id.to_string()));
        }

        let evicted = stores.toggle(id.clone());
        tracing::debug!(flow = %self.id, selected = ?stores.ids(), "store selection changed");

        self.state = if stores.is_empty() {
            FlowState::ColorChosen { color }
        } else {
            FlowState::StoresChosen { color, stores }
        };
        Ok(evicted)
    }

    /// Mark the selected stores as messaged.
    ///
    /// The returned ticket must accompany the replies.
    pub fn begin_request(&mut self) -> Result<RequestId, CommerceError> {
        let FlowState::StoresChosen { color, stores } = &self.state else {
            return Err(self.rejected(FlowStep::RepliesPending));
        };

        let request = RequestId::generate();
        tracing::info!(flow = %self.id, request = %request, stores = ?stores.ids(), "awaiting store replies");
        self.state = FlowState::RepliesPending {
            color: color.clone(),
            stores: stores.clone(),
            request: request.clone(),
        };
        Ok(request)
    }

    /// Stop waiting on replies and return to the store selection.
    pub fn cancel_request(&mut self) -> Result<(), CommerceError> {
        let FlowState::RepliesPending { color, stores, request } = &self.state else {
            return Err(self.rejected(FlowStep::StoresChosen));
        };

        tracing::info!(flow = %self.id, request = %request, "cancelled availability request");
        self.state = FlowState::StoresChosen {
            color: color.clone(),
            stores: stores.clone(),
        };
        Ok(())
    }

    /// Apply the replies for the pending request.
    ///
    /// Replies for any other ticket, or covering a different set of stores,
    /// are rejected as stale.
    pub fn receive_replies(&mut self, ticket: &RequestId, replies: ReplyMap) -> Result<(), CommerceError> {
        let (color, stores) = match &self.state {
            FlowState::RepliesPending { color, stores, request } if request == ticket => {
                (color, stores)
            }
            _ => {
                tracing::warn!(flow = %self.id, request = %ticket, "dropping stale replies");
                return Err(CommerceError::StaleReplies(ticket.to_string()));
            }
        };

        if !covers_selection(stores, &replies) {
            tracing::warn!(flow = %self.id, request = %ticket, "replies do not cover the selected stores");
            return Err(CommerceError::StaleReplies(ticket.to_string()));
        }

        tracing::info!(
            flow = %self.id,
            available = available_store_ids(&replies).len(),
            "store replies applied"
        );
        self.state = FlowState::RepliesReceived {
            color: color.clone(),
            stores: stores.clone(),
            replies,
        };
        Ok(())
    }

    /// Discard the replies and pick stores again.
    pub fn restart_store_selection(&mut self) -> Result<(), CommerceError> {
        let FlowState::RepliesReceived { color, .. } = &self.state else {
            return Err(self.rejected(FlowStep::ColorChosen));
        };
        self.state = FlowState::ColorChosen {
            color: color.clone(),
        };
        Ok(())
    }

    /// Validate the fulfillment form and move to review.
    pub fn choose_fulfillment(&mut self, form: &FulfillmentForm) -> Result<Fulfillment, CommerceError> {
        let FlowState::RepliesReceived { color, replies, .. } = &self.state else {
            return Err(self.rejected(FlowStep::FulfillmentChosen));
        };

        let available = available_store_ids(replies);
        if available.is_empty() {
            tracing::warn!(flow = %self.id, "no store has the product");
            return Err(CommerceError::NoAvailability);
        }
        let fulfillment = form.validate(&available).map_err(|e| {
            tracing::warn!(flow = %self.id, error = %e, "fulfillment form rejected");
            e
        })?;

        tracing::info!(flow = %self.id, kind = %fulfillment.kind(), "fulfillment chosen");
        self.state = FlowState::FulfillmentChosen {
            color: color.clone(),
            replies: replies.clone(),
            fulfillment: fulfillment.clone(),
        };
        Ok(fulfillment)
    }

    /// Place the order.
    pub fn confirm<C>(&mut self, catalog: &C, now: DateTime<Utc>) -> Result<OrderSummary, CommerceError>
    where
        C: CatalogRepository + ?Sized,
    {
        let FlowState::FulfillmentChosen { color, fulfillment, .. } = &self.state else {
            return Err(self.rejected(FlowStep::OrderConfirmed));
        };

        let details = match fulfillment {
            Fulfillment::Delivery { address, fee, eta } => OrderFulfillment::Delivery {
                address: address.clone(),
                fee: *fee,
                eta: eta.clone(),
            },
            Fulfillment::Pickup { store_id } => {
                let store = catalog
                    .store(store_id)
                    .ok_or_else(|| CommerceError::StoreNotFound(store_id.to_string()))?;
                OrderFulfillment::Pickup {
                    store: PickupStore::from(store),
                    eta: PICKUP_SUMMARY_ETA.to_string(),
                }
            }
        };

        let order = OrderSummary::new(&self.product, color.clone(), details, now);
        tracing::info!(flow = %self.id, order = %order.id, "order confirmed");
        self.state = FlowState::OrderConfirmed {
            order: order.clone(),
        };
        Ok(order)
    }

    /// End the flow. Replies still in transit can no longer be applied.
    pub fn abandon(self) -> FlowId {
        tracing::info!(flow = %self.id, step = self.step().as_str(), "abandoned purchase flow");
        self.id
    }

    fn rejected(&self, to: FlowStep) -> CommerceError {
        let from = self.step();
        tracing::warn!(flow = %self.id, from = from.as_str(), to = to.as_str(), "invalid flow transition");
        CommerceError::InvalidTransition {
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

/// Replies are keyed by exactly the selected stores.
fn covers_selection(stores: &StoreSelection, replies: &ReplyMap) -> bool {
    replies.len() == stores.len() && stores.ids().iter().all(|id| replies.contains_key(id))
}

fn default_nearby_limit() -> usize {
    DEFAULT_NEARBY_LIMIT
}

/// Wire form of [`PurchaseFlow`].
#[derive(Deserialize)]
struct PurchaseFlowRecord {
    id: FlowId,
    product: Product,
    #[serde(default = "default_nearby_limit")]
    nearby_limit: usize,
    state: FlowState,
}

impl TryFrom<PurchaseFlowRecord> for PurchaseFlow {
    type Error = CommerceError;

    fn try_from(record: PurchaseFlowRecord) -> Result<Self, Self::Error> {
        let flow = PurchaseFlow {
            id: record.id,
            product: record.product,
            nearby_limit: record.nearby_limit,
            state: record.state,
        };

        if let Some(color) = flow.color() {
            let known = flow.product.select_color(&color.id)?;
            if known != color {
                return Err(CommerceError::InvalidFlowState(format!(
                    "color {} does not match product {}",
                    color.id, flow.product.id
                )));
            }
        }

        match &flow.state {
            FlowState::RepliesReceived { stores, replies, .. } if !covers_selection(stores, replies) => {
                return Err(CommerceError::InvalidFlowState(
                    "replies do not cover the selected stores".to_string(),
                ));
            }
            FlowState::FulfillmentChosen { replies, fulfillment, .. } => {
                let available = available_store_ids(replies);
                if available.is_empty() {
                    return Err(CommerceError::NoAvailability);
                }
                match fulfillment {
                    Fulfillment::Pickup { store_id } if !available.contains(store_id) => {
                        return Err(CommerceError::InvalidFlowState(format!(
                            "pickup store {store_id} does not have the product"
                        )));
                    }
                    Fulfillment::Delivery { address, .. } if !address.is_complete() => {
                        return Err(CommerceError::missing(&address.missing_fields()));
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        Ok(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{EtaLabel, StoreReply};
    use crate::catalog::InMemoryCatalog;
    use crate::checkout::{DeliveryAddress, FulfillmentKind};
    use crate::ids::ProductId;
    use crate::money::Money;

    fn flow_for(catalog: &InMemoryCatalog, product: &str) -> PurchaseFlow {
        PurchaseFlow::new(catalog.product(&ProductId::new(product)).cloned().unwrap())
    }

    fn sid(s: &str) -> StoreId {
        StoreId::new(s)
    }

    fn replies(entries: &[(&str, bool)]) -> ReplyMap {
        entries
            .iter()
            .map(|(id, available)| {
                let reply = if *available {
                    StoreReply::in_stock(Money::usd(5999), EtaLabel::OneToTwoHours)
                } else {
                    StoreReply::out_of_stock()
                };
                (sid(id), reply)
            })
            .collect()
    }

    /// A bulb flow with s2 and s6 messaged and the given replies applied.
    fn received(catalog: &InMemoryCatalog, entries: &[(&str, bool)]) -> PurchaseFlow {
        let mut flow = flow_for(catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        flow.toggle_store(catalog, &sid("s2")).unwrap();
        flow.toggle_store(catalog, &sid("s6")).unwrap();
        let ticket = flow.begin_request().unwrap();
        flow.receive_replies(&ticket, replies(entries)).unwrap();
        flow
    }

    #[test]
    fn test_step_metadata() {
        assert_eq!(FlowStep::NoSelection.number(), 1);
        assert_eq!(FlowStep::OrderConfirmed.progress_percent(), 100);
        assert_eq!(FlowStep::RepliesPending.as_str(), "replies_pending");
    }

    #[test]
    fn test_unavailable_color_rejected() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "1");

        let err = flow.choose_color(&ColorId::new("c3")).unwrap_err();
        assert_eq!(err, CommerceError::ColorUnavailable("White".to_string()));
        assert_eq!(flow.step(), FlowStep::NoSelection);

        let err = flow.choose_color(&ColorId::new("c9")).unwrap_err();
        assert!(matches!(err, CommerceError::ColorNotFound(_)));

        assert_eq!(flow.choose_color(&ColorId::new("c2")).unwrap().name, "Black");
        assert_eq!(flow.step(), FlowStep::ColorChosen);
    }

    #[test]
    fn test_toggle_back_to_color_chosen() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();

        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        assert_eq!(flow.step(), FlowStep::StoresChosen);
        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        assert_eq!(flow.step(), FlowStep::ColorChosen);
        assert!(flow.selected_stores().is_none());
    }

    #[test]
    fn test_toggle_evicts_and_rejects_unknown() {
        // s4 relabelled so three electronics stores are on offer
        let seeded = InMemoryCatalog::seeded();
        let mut stores = seeded.stores().to_vec();
        stores[3].category = "Electronics".to_string();
        let catalog = InMemoryCatalog::new(seeded.products().to_vec(), stores).unwrap();
        let mut flow = flow_for(&catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();

        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        flow.toggle_store(&catalog, &sid("s6")).unwrap();
        assert_eq!(flow.toggle_store(&catalog, &sid("s4")).unwrap(), Some(sid("s2")));
        assert_eq!(flow.selected_stores().unwrap().ids(), &[sid("s6"), sid("s4")]);

        let before = flow.clone();
        let err = flow.toggle_store(&catalog, &sid("nope")).unwrap_err();
        assert_eq!(err, CommerceError::StoreNotFound("nope".to_string()));
        assert_eq!(flow, before);
    }

    #[test]
    fn test_toggle_rejects_store_outside_category() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        let before = flow.clone();

        // s1 sells Home & Kitchen, the bulb is Electronics
        let err = flow.toggle_store(&catalog, &sid("s1")).unwrap_err();
        assert_eq!(err, CommerceError::StoreNotNearby("s1".to_string()));
        assert!(err.is_user_correctable());
        assert_eq!(flow, before);
    }

    #[test]
    fn test_toggle_respects_nearby_limit() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4").with_nearby_limit(1);
        flow.choose_color(&ColorId::new("c1")).unwrap();

        // s2 at 3.1 km is closer than s6 at 3.8 km
        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        let err = flow.toggle_store(&catalog, &sid("s6")).unwrap_err();
        assert_eq!(err, CommerceError::StoreNotNearby("s6".to_string()));
        assert_eq!(flow.nearby_limit(), 1);
    }

    #[test]
    fn test_toggle_requires_color() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");
        let err = flow.toggle_store(&catalog, &sid("s2")).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidTransition { .. }));
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        flow.toggle_store(&catalog, &sid("s2")).unwrap();

        let first = flow.begin_request().unwrap();
        flow.cancel_request().unwrap();
        let second = flow.begin_request().unwrap();

        let err = flow.receive_replies(&first, replies(&[("s2", true)])).unwrap_err();
        assert!(matches!(err, CommerceError::StaleReplies(_)));
        assert_eq!(flow.step(), FlowStep::RepliesPending);

        flow.receive_replies(&second, replies(&[("s2", true)])).unwrap();
        assert_eq!(flow.step(), FlowStep::RepliesReceived);
    }

    #[test]
    fn test_replies_must_match_selection() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        flow.toggle_store(&catalog, &sid("s2")).unwrap();
        let ticket = flow.begin_request().unwrap();

        let err = flow
            .receive_replies(&ticket, replies(&[("s2", true), ("s6", true)]))
            .unwrap_err();
        assert!(matches!(err, CommerceError::StaleReplies(_)));
        let err = flow.receive_replies(&ticket, replies(&[("s6", true)])).unwrap_err();
        assert!(matches!(err, CommerceError::StaleReplies(_)));
        assert_eq!(flow.step(), FlowStep::RepliesPending);
    }

    #[test]
    fn test_no_availability_blocks_fulfillment() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = received(&catalog, &[("s2", false), ("s6", false)]);

        let options = flow.fulfillment_options(&catalog).unwrap();
        assert!(options[0].available);
        assert!(!options[1].available);

        let form = FulfillmentForm::delivery(DeliveryAddress::new("1 Elm St", "Boston", ""));
        assert_eq!(flow.choose_fulfillment(&form).unwrap_err(), CommerceError::NoAvailability);
        assert_eq!(flow.step(), FlowStep::RepliesReceived);

        flow.restart_store_selection().unwrap();
        assert_eq!(flow.step(), FlowStep::ColorChosen);
        assert_eq!(flow.color().unwrap().id, ColorId::new("c1"));
    }

    #[test]
    fn test_empty_delivery_address_rejected() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = received(&catalog, &[("s2", true), ("s6", false)]);
        let before = flow.clone();

        let form = FulfillmentForm {
            kind: Some(FulfillmentKind::Delivery),
            ..FulfillmentForm::default()
        };
        let err = flow.choose_fulfillment(&form).unwrap_err();
        assert_eq!(err, CommerceError::missing(&["address", "city"]));
        assert_eq!(flow, before);
    }

    #[test]
    fn test_pickup_limited_to_available_stores() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = received(&catalog, &[("s2", true), ("s6", false)]);

        assert_eq!(flow.available_stores(&catalog).len(), 1);
        let err = flow.choose_fulfillment(&FulfillmentForm::pickup(sid("s6"))).unwrap_err();
        assert_eq!(err, CommerceError::missing(&["pickup store"]));

        let fulfillment = flow.choose_fulfillment(&FulfillmentForm::pickup(sid("s2"))).unwrap();
        assert_eq!(fulfillment.kind(), FulfillmentKind::Pickup);
    }

    #[test]
    fn test_confirm_pickup_order() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = received(&catalog, &[("s2", true), ("s6", true)]);
        flow.choose_fulfillment(&FulfillmentForm::pickup(sid("s6"))).unwrap();

        let order = flow.confirm(&catalog, Utc::now()).unwrap();
        match &order.fulfillment {
            OrderFulfillment::Pickup { store, eta } => {
                assert_eq!(store.name, "ElectroWorld Express");
                assert_eq!(eta, "~1 hour");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(order.color.name, "White");
        assert_eq!(flow.step(), FlowStep::OrderConfirmed);
        assert_eq!(flow.order(), Some(&order));

        let err = flow.confirm(&catalog, Utc::now()).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidTransition { .. }));
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "4");

        assert!(flow.begin_request().is_err());
        assert!(flow.restart_store_selection().is_err());
        assert!(flow.choose_fulfillment(&FulfillmentForm::default()).is_err());
        assert!(flow.confirm(&catalog, Utc::now()).is_err());
        assert!(flow.fulfillment_options(&catalog).is_err());
        assert_eq!(flow.step(), FlowStep::NoSelection);
    }

    #[test]
    fn test_flow_round_trips_through_json() {
        let catalog = InMemoryCatalog::seeded();
        let flow = received(&catalog, &[("s2", true), ("s6", false)]);

        let json = serde_json::to_string(&flow).unwrap();
        let restored: PurchaseFlow = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, flow);
        assert_eq!(restored.step(), FlowStep::RepliesReceived);
    }

    /// JSON for a bulb flow at review, with the given overrides applied.
    fn review_json(catalog: &InMemoryCatalog, pickup: &str) -> serde_json::Value {
        let mut flow = received(catalog, &[("s2", true), ("s6", false)]);
        flow.choose_fulfillment(&FulfillmentForm::pickup(sid("s2"))).unwrap();
        let mut json = serde_json::to_value(&flow).unwrap();
        json["state"]["fulfillment"]["store_id"] = serde_json::json!(pickup);
        json
    }

    #[test]
    fn test_restore_accepts_valid_review() {
        let catalog = InMemoryCatalog::seeded();
        let json = review_json(&catalog, "s2");
        let restored: PurchaseFlow = serde_json::from_value(json).unwrap();
        assert_eq!(restored.step(), FlowStep::FulfillmentChosen);
        assert_eq!(restored.nearby_limit(), DEFAULT_NEARBY_LIMIT);
    }

    #[test]
    fn test_restore_rejects_pickup_from_out_of_stock_store() {
        let catalog = InMemoryCatalog::seeded();
        let json = review_json(&catalog, "s6");
        assert!(serde_json::from_value::<PurchaseFlow>(json).is_err());
    }

    #[test]
    fn test_restore_rejects_review_without_availability() {
        let catalog = InMemoryCatalog::seeded();
        let mut json = review_json(&catalog, "s2");
        json["state"]["replies"]["s2"] = serde_json::json!({ "available": false });
        assert!(serde_json::from_value::<PurchaseFlow>(json).is_err());
    }

    #[test]
    fn test_restore_rejects_incomplete_delivery_address() {
        let catalog = InMemoryCatalog::seeded();
        let mut json = review_json(&catalog, "s2");
        json["state"]["fulfillment"] = serde_json::json!({
            "type": "delivery",
            "address": { "address": "", "city": "Boston", "postal_code": "" },
            "fee": Money::usd(799),
            "eta": "2-3 hours",
        });
        assert!(serde_json::from_value::<PurchaseFlow>(json).is_err());
    }

    #[test]
    fn test_restore_rejects_unavailable_color() {
        let catalog = InMemoryCatalog::seeded();
        let mut flow = flow_for(&catalog, "1");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        let mut json = serde_json::to_value(&flow).unwrap();

        // White is out of stock on the kettle
        json["state"]["color"] = serde_json::to_value(&flow.product.colors[2]).unwrap();
        let err = serde_json::from_value::<PurchaseFlow>(json).unwrap_err();
        assert!(err.to_string().contains("White"));
    }

    #[test]
    fn test_restore_rejects_color_from_another_product() {
        let catalog = InMemoryCatalog::seeded();
        let bulb = catalog.product(&ProductId::new("4")).unwrap();
        let mut flow = flow_for(&catalog, "1");
        flow.choose_color(&ColorId::new("c1")).unwrap();
        let mut json = serde_json::to_value(&flow).unwrap();

        // same id, the bulb's White instead of the kettle's Silver
        json["state"]["color"] = serde_json::to_value(&bulb.colors[0]).unwrap();
        assert!(serde_json::from_value::<PurchaseFlow>(json.clone()).is_err());

        json["state"]["color"]["id"] = serde_json::json!("c9");
        assert!(serde_json::from_value::<PurchaseFlow>(json).is_err());
    }

    #[test]
    fn test_restore_rejects_replies_for_other_stores() {
        let catalog = InMemoryCatalog::seeded();
        let flow = received(&catalog, &[("s2", true), ("s6", false)]);
        let mut json = serde_json::to_value(&flow).unwrap();

        json["state"]["replies"] = serde_json::json!({ "s2": { "available": false } });
        let err = serde_json::from_value::<PurchaseFlow>(json).unwrap_err();
        assert!(err.to_string().contains("replies do not cover"));
    }
}
