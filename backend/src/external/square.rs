//! Square POS API client
//!
//! Reads the bar's catalog, stock counts and sales. Only items filed under a
//! bar-looking category are kept, and event/food items are skipped by name.
//! Stock and sales are counted on the "Regular" variation of each item when
//! it has one, since other variations (jugs, doubles) share the same stock.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{round_dp, RawItem, SalesPeriod, SoldTotals};

use crate::config::SquareConfig;
use crate::error::{AppError, AppResult};

/// Category names containing any of these are bar categories
const BAR_CATEGORY_KEYWORDS: &[&str] = &[
    "beer", "wine", "spirit", "cider", "premix", "sparkling", "liqueur", "fortified", "rose",
    "soft drink", "mixer", "snack", "chip", "nut", "beverage", "alcohol", "whisky", "whiskey",
    "rum", "gin", "vodka", "bourbon", "brandy", "champagne", "seltzer", "bar snack", "pre mix",
];

/// Items whose names contain any of these are not bar stock
const SKIP_KEYWORDS: &[&str] = &[
    "ticket", "raffle", "dinner", "lunch", "bbq", "burger", "sausage", "roll", "sandwich",
    "curry", "pie", "trivia", "bingo", "cruise", "shirt", "polo", "sweep", "event", "party",
    "session", "music", "aqua", "hypno", "fashion", "yoga", "exercise", "strength", "mobility",
    "produce", "account", "hosting", "coffee", "pod", "token",
];

/// Inventory count lookups accept at most this many ids per request
const COUNT_BATCH_SIZE: usize = 1000;

/// Orders returned per search page
const ORDER_PAGE_LIMIT: u32 = 500;

/// Purchase orders returned by one search
const PURCHASE_ORDER_LIMIT: u32 = 20;

/// Square API client
#[derive(Clone)]
pub struct SquareClient {
    client: Client,
    access_token: String,
    base_url: String,
    api_version: String,
    max_change_pages: u32,
    max_order_pages: u32,
}

/// A sellable variation of a bar item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogVariation {
    pub variation_id: String,
    pub item_id: String,
    pub parent_name: String,
    pub variation_name: String,
    pub sku: String,
    /// Sell price in dollars
    pub sell_price: Option<Decimal>,
}

impl CatalogVariation {
    /// Regular (or unnamed) variations carry the item's stock and sales
    pub fn is_regular(&self) -> bool {
        let name = self.variation_name.to_lowercase();
        name == "regular" || name.is_empty()
    }
}

/// Units sold per variation and when each last sold
#[derive(Debug, Clone, Default)]
pub struct SoldSummary {
    pub sold: HashMap<String, Decimal>,
    pub last_sold: HashMap<String, DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ListLocationsResponse {
    #[serde(default)]
    locations: Vec<SquareLocation>,
}

#[derive(Debug, Deserialize)]
struct SquareLocation {
    id: String,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogListResponse {
    #[serde(default)]
    objects: Vec<CatalogObject>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogObject {
    #[serde(rename = "type")]
    object_type: String,
    id: String,
    category_data: Option<CategoryData>,
    item_data: Option<ItemData>,
    item_variation_data: Option<VariationData>,
}

#[derive(Debug, Deserialize)]
struct CategoryData {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    name: Option<String>,
    category_id: Option<String>,
    #[serde(default)]
    categories: Vec<CategoryRef>,
    reporting_category: Option<CategoryRef>,
}

#[derive(Debug, Deserialize)]
struct CategoryRef {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VariationData {
    item_id: Option<String>,
    name: Option<String>,
    sku: Option<String>,
    price_money: Option<Money>,
}

#[derive(Debug, Deserialize)]
struct Money {
    amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct InventoryCountsResponse {
    #[serde(default)]
    counts: Vec<InventoryCount>,
}

#[derive(Debug, Deserialize)]
struct InventoryCount {
    catalog_object_id: String,
    quantity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InventoryChangesResponse {
    #[serde(default)]
    changes: Vec<InventoryChange>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InventoryChange {
    adjustment: Option<InventoryAdjustment>,
}

#[derive(Debug, Deserialize)]
struct InventoryAdjustment {
    catalog_object_id: Option<String>,
    from_state: Option<String>,
    to_state: Option<String>,
    quantity: Option<String>,
    occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SearchOrdersResponse {
    #[serde(default)]
    orders: Vec<SquareOrder>,
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquareOrder {
    #[serde(default)]
    line_items: Vec<OrderLineItem>,
}

#[derive(Debug, Deserialize)]
struct OrderLineItem {
    catalog_object_id: Option<String>,
    quantity: Option<String>,
    base_price_money: Option<Money>,
    gross_sales_money: Option<Money>,
}

/// Recent purchase orders raised for the bar's location, passed through as
/// Square returns them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrders {
    pub orders: Vec<serde_json::Value>,
    pub location_id: String,
    /// Orders returned before filtering by location
    pub total: usize,
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPurchaseOrdersResponse {
    #[serde(default)]
    purchase_orders: Vec<serde_json::Value>,
    cursor: Option<String>,
}

/// Square error envelope
#[derive(Debug, Deserialize)]
struct SquareErrors {
    #[serde(default)]
    errors: Vec<SquareErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SquareErrorDetail {
    code: Option<String>,
    detail: Option<String>,
}

impl SquareClient {
    /// Create a new SquareClient
    pub fn new(config: &SquareConfig) -> Self {
        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            max_change_pages: config.max_change_pages,
            max_order_pages: config.max_order_pages,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .header("Square-Version", &self.api_version)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        if !self.is_configured() {
            return Err(AppError::PosNotConfigured);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::PosApi(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::PosApi(format!(
                "{} - {}",
                status,
                describe_error_body(&body)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PosApi(format!("failed to parse response: {}", e)))
    }

    /// First active location of the merchant
    pub async fn get_location_id(&self) -> AppResult<String> {
        let data: ListLocationsResponse = self.send(self.request(Method::GET, "/locations")).await?;

        data.locations
            .into_iter()
            .find(|l| l.status.as_deref() == Some("ACTIVE"))
            .map(|l| l.id)
            .ok_or_else(|| AppError::PosApi("No active Square locations found".to_string()))
    }

    async fn get_bar_category_ids(&self) -> AppResult<HashSet<String>> {
        let data: CatalogListResponse = self
            .send(
                self.request(Method::GET, "/catalog/list")
                    .query(&[("types", "CATEGORY")]),
            )
            .await?;

        Ok(data
            .objects
            .into_iter()
            .filter(|obj| obj.object_type == "CATEGORY")
            .filter(|obj| {
                obj.category_data
                    .as_ref()
                    .and_then(|c| c.name.as_deref())
                    .map(is_bar_category)
                    .unwrap_or(false)
            })
            .map(|obj| obj.id)
            .collect())
    }

    /// Bar variations in catalog order
    pub async fn get_catalog(&self) -> AppResult<Vec<CatalogVariation>> {
        let bar_category_ids = self.get_bar_category_ids().await?;

        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut request = self
                .request(Method::GET, "/catalog/list")
                .query(&[("types", "ITEM,ITEM_VARIATION")]);
            if let Some(c) = &cursor {
                request = request.query(&[("cursor", c)]);
            }
            let data: CatalogListResponse = self.send(request).await?;
            objects.extend(data.objects);

            match data.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        let catalog = filter_catalog(objects, &bar_category_ids);
        tracing::debug!("Loaded {} bar variations from Square catalog", catalog.len());
        Ok(catalog)
    }

    async fn get_inventory_counts(
        &self,
        location_id: &str,
        variation_ids: &[String],
    ) -> AppResult<HashMap<String, Decimal>> {
        let mut counts: HashMap<String, Decimal> = HashMap::new();

        for chunk in variation_ids.chunks(COUNT_BATCH_SIZE) {
            let body = json!({
                "catalog_object_ids": chunk,
                "location_ids": [location_id],
                "states": ["IN_STOCK"],
            });
            let data: InventoryCountsResponse = self
                .send(self.request(Method::POST, "/inventory/counts/batch-retrieve").json(&body))
                .await?;

            for count in data.counts {
                *counts.entry(count.catalog_object_id).or_default() +=
                    parse_quantity(count.quantity.as_deref());
            }
        }

        Ok(counts)
    }

    async fn get_sold_quantities(&self, location_id: &str, days_back: u32) -> AppResult<SoldSummary> {
        let since = Utc::now() - Duration::days(i64::from(days_back));
        let mut summary = SoldSummary::default();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            if page > self.max_change_pages {
                tracing::warn!(
                    "Stopped reading inventory changes after {} pages",
                    self.max_change_pages
                );
                break;
            }

            let mut body = json!({
                "location_ids": [location_id],
                "types": ["ADJUSTMENT"],
                "updated_after": since.to_rfc3339(),
            });
            if let Some(c) = &cursor {
                body["cursor"] = json!(c);
            }

            let data: InventoryChangesResponse = self
                .send(self.request(Method::POST, "/inventory/changes/batch-retrieve").json(&body))
                .await?;
            if data.changes.is_empty() {
                break;
            }

            for adjustment in data.changes.into_iter().filter_map(|c| c.adjustment) {
                record_sale(&mut summary, adjustment);
            }

            match data.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(summary)
    }

    /// Fetch the bar's items with stock on hand and weekly sales averages
    pub async fn fetch_items(&self, days_back: u32) -> AppResult<Vec<RawItem>> {
        let location_id = self.get_location_id().await?;
        let catalog = self.get_catalog().await?;
        let variation_ids: Vec<String> = catalog.iter().map(|v| v.variation_id.clone()).collect();

        let counts = self.get_inventory_counts(&location_id, &variation_ids).await?;
        let sold = self.get_sold_quantities(&location_id, days_back).await?;

        Ok(build_raw_items(&catalog, &counts, &sold, days_back))
    }

    /// Units and revenue per item name over a period, from completed orders
    pub async fn fetch_sales(&self, period: &SalesPeriod) -> AppResult<HashMap<String, SoldTotals>> {
        let location_id = self.get_location_id().await?;
        let catalog = self.get_catalog().await?;
        let by_variation: HashMap<&str, &CatalogVariation> = catalog
            .iter()
            .map(|v| (v.variation_id.as_str(), v))
            .collect();

        let mut tally = SalesTally::default();
        let mut cursor: Option<String> = None;
        let mut page = 0;

        loop {
            page += 1;
            if page > self.max_order_pages {
                tracing::warn!("Stopped reading orders after {} pages", self.max_order_pages);
                break;
            }

            let mut body = json!({
                "location_ids": [location_id],
                "query": {
                    "filter": {
                        "date_time_filter": {
                            "created_at": {
                                "start_at": period.start.to_rfc3339(),
                                "end_at": period.end.to_rfc3339(),
                            }
                        },
                        "state_filter": { "states": ["COMPLETED"] }
                    }
                },
                "limit": ORDER_PAGE_LIMIT,
            });
            if let Some(c) = &cursor {
                body["cursor"] = json!(c);
            }

            let data: SearchOrdersResponse = self
                .send(self.request(Method::POST, "/orders/search").json(&body))
                .await?;
            if data.orders.is_empty() {
                break;
            }

            for line_item in data.orders.iter().flat_map(|o| o.line_items.iter()) {
                tally.record(line_item, &by_variation);
            }

            match data.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(tally.into_totals())
    }

    /// Most recent purchase orders for the active location
    pub async fn search_purchase_orders(&self) -> AppResult<PurchaseOrders> {
        let location_id = self.get_location_id().await?;
        let body = json!({ "limit": PURCHASE_ORDER_LIMIT });

        let data: SearchPurchaseOrdersResponse = self
            .send(self.request(Method::POST, "/purchase-orders/search").json(&body))
            .await?;

        let total = data.purchase_orders.len();
        let orders = orders_at_location(data.purchase_orders, &location_id);
        tracing::info!("Found {} of {} purchase orders at {}", orders.len(), total, location_id);

        Ok(PurchaseOrders {
            orders,
            location_id,
            total,
            cursor: data.cursor.filter(|c| !c.is_empty()),
        })
    }
}

/// Whether a Square category name looks like bar stock
pub fn is_bar_category(name: &str) -> bool {
    let name = name.to_lowercase();
    BAR_CATEGORY_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Whether an item name marks it as a non-stock item (events, food)
pub fn is_skipped_item(name: &str) -> bool {
    let name = name.to_lowercase();
    SKIP_KEYWORDS.iter().any(|kw| name.contains(kw))
}

fn parse_quantity(quantity: Option<&str>) -> Decimal {
    quantity
        .and_then(|q| q.trim().parse::<Decimal>().ok())
        .unwrap_or_default()
}

fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn orders_at_location(orders: Vec<serde_json::Value>, location_id: &str) -> Vec<serde_json::Value> {
    orders
        .into_iter()
        .filter(|o| o["location_id"].as_str() == Some(location_id))
        .collect()
}

fn describe_error_body(body: &str) -> String {
    serde_json::from_str::<SquareErrors>(body)
        .ok()
        .and_then(|e| e.errors.into_iter().next())
        .map(|e| match (e.code, e.detail) {
            (Some(code), Some(detail)) => format!("{}: {}", code, detail),
            (None, Some(detail)) => detail,
            (Some(code), None) => code,
            (None, None) => body.to_string(),
        })
        .unwrap_or_else(|| body.to_string())
}

/// Keep variations whose parent item is in a bar category and is not a
/// skipped item. Output preserves catalog order.
fn filter_catalog(objects: Vec<CatalogObject>, bar_category_ids: &HashSet<String>) -> Vec<CatalogVariation> {
    let mut bar_items: HashMap<String, String> = HashMap::new();
    let mut variations = Vec::new();

    for obj in objects {
        match obj.object_type.as_str() {
            "ITEM" => {
                let Some(data) = obj.item_data else { continue };
                let category_ids = data
                    .category_id
                    .iter()
                    .chain(data.categories.iter().filter_map(|c| c.id.as_ref()))
                    .chain(data.reporting_category.as_ref().and_then(|c| c.id.as_ref()));
                let in_bar_category = category_ids
                    .into_iter()
                    .any(|id| bar_category_ids.contains(id));

                if in_bar_category {
                    bar_items.insert(obj.id, data.name.unwrap_or_else(|| "Unknown".to_string()));
                }
            }
            "ITEM_VARIATION" => {
                if let Some(data) = obj.item_variation_data {
                    variations.push((obj.id, data));
                }
            }
            _ => {}
        }
    }

    variations
        .into_iter()
        .filter_map(|(variation_id, data)| {
            let item_id = data.item_id.unwrap_or_default();
            let parent_name = bar_items.get(&item_id)?.clone();
            if is_skipped_item(&parent_name) {
                return None;
            }
            Some(CatalogVariation {
                variation_id,
                item_id,
                parent_name,
                variation_name: data.name.unwrap_or_else(|| "Regular".to_string()),
                sku: data.sku.unwrap_or_default(),
                sell_price: data.price_money.and_then(|m| m.amount).map(cents_to_dollars),
            })
        })
        .collect()
}

fn record_sale(summary: &mut SoldSummary, adjustment: InventoryAdjustment) {
    let Some(variation_id) = adjustment.catalog_object_id else { return };
    let is_sale = adjustment.from_state.as_deref() == Some("IN_STOCK")
        && adjustment.to_state.as_deref() == Some("SOLD");
    if !is_sale {
        return;
    }

    let qty = parse_quantity(adjustment.quantity.as_deref()).abs();
    *summary.sold.entry(variation_id.clone()).or_default() += qty;

    if let Some(at) = adjustment.occurred_at {
        let latest = summary.last_sold.entry(variation_id).or_insert(at);
        if at > *latest {
            *latest = at;
        }
    }
}

/// Roll variation-level figures up to one record per item name
fn build_raw_items(
    catalog: &[CatalogVariation],
    counts: &HashMap<String, Decimal>,
    sold: &SoldSummary,
    days_back: u32,
) -> Vec<RawItem> {
    let mut groups: BTreeMap<&str, Vec<&CatalogVariation>> = BTreeMap::new();
    for variation in catalog {
        groups.entry(&variation.parent_name).or_default().push(variation);
    }

    let weeks = Decimal::from(days_back.max(1)) / Decimal::from(7);

    groups
        .into_iter()
        .map(|(name, variations)| {
            let regular: Vec<&CatalogVariation> =
                variations.iter().copied().filter(|v| v.is_regular()).collect();
            let counted = if regular.is_empty() { variations } else { regular };

            let on_hand: Decimal = counted
                .iter()
                .map(|v| counts.get(&v.variation_id).copied().unwrap_or_default())
                .sum();
            let total_sold: Decimal = counted
                .iter()
                .map(|v| sold.sold.get(&v.variation_id).copied().unwrap_or_default())
                .sum();
            let total_sold = round_dp(total_sold, 0);
            let last_sold = counted
                .iter()
                .filter_map(|v| sold.last_sold.get(&v.variation_id))
                .max()
                .map(|at| at.date_naive());

            RawItem {
                name: name.to_string(),
                on_hand: round_dp(on_hand, 0),
                weekly_avg: round_dp(total_sold / weeks, 1),
                sold_last_n: total_sold,
                last_sold,
                square_sell_price: counted.first().and_then(|v| v.sell_price),
            }
        })
        .collect()
}

/// Order line items summed per item name
#[derive(Debug, Default)]
struct SalesTally {
    units: HashMap<String, Decimal>,
    revenue_cents: HashMap<String, Decimal>,
}

impl SalesTally {
    fn record(&mut self, line_item: &OrderLineItem, by_variation: &HashMap<&str, &CatalogVariation>) {
        let Some(variation) = line_item
            .catalog_object_id
            .as_deref()
            .and_then(|id| by_variation.get(id))
        else {
            return;
        };
        if !variation.is_regular() {
            return;
        }

        let qty = parse_quantity(line_item.quantity.as_deref());
        let unit_cents = Decimal::from(
            line_item
                .base_price_money
                .as_ref()
                .and_then(|m| m.amount)
                .unwrap_or(0),
        );
        let total_cents = match line_item.gross_sales_money.as_ref().and_then(|m| m.amount) {
            Some(amount) if amount != 0 => Decimal::from(amount),
            _ => unit_cents * qty,
        };

        let name = variation.parent_name.clone();
        *self.units.entry(name.clone()).or_default() += qty;
        *self.revenue_cents.entry(name).or_default() += total_cents;
    }

    fn into_totals(self) -> HashMap<String, SoldTotals> {
        let mut totals: HashMap<String, SoldTotals> = HashMap::new();
        for (name, units) in self.units {
            totals.entry(name).or_default().units = round_dp(units, 0);
        }
        for (name, cents) in self.revenue_cents {
            let revenue = (!cents.is_zero()).then(|| round_dp(cents / Decimal::ONE_HUNDRED, 2));
            totals.entry(name).or_default().revenue = revenue;
        }
        totals
    }
}
