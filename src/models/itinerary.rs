use serde::{Deserialize, Serialize};

pub const TRANSPORT: &str = "transport";
pub const LODGING: &str = "lodging";
pub const EVENT: &str = "event";

/// Flat document shape of an itinerary element, as it travels over the wire
/// and sits in storage. Every field is optional.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFields {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub address: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub payment_status: Option<String>,
    pub flight_status: Option<String>,
    pub flight_gate: Option<String>,
    pub seat: Option<String>,
    pub event_datetime: Option<String>,
    pub notes: Option<String>,
}

impl ElementFields {
    fn has_transport_fields(&self) -> bool {
        self.from.is_some()
            || self.to.is_some()
            || self.departure.is_some()
            || self.arrival.is_some()
            || self.flight_status.is_some()
            || self.flight_gate.is_some()
            || self.seat.is_some()
    }

    fn has_lodging_fields(&self) -> bool {
        self.check_in.is_some() || self.check_out.is_some() || self.payment_status.is_some()
    }

    fn fits_transport(&self) -> bool {
        !self.has_lodging_fields() && self.address.is_none() && self.event_datetime.is_none()
    }

    fn fits_lodging(&self) -> bool {
        !self.has_transport_fields() && self.event_datetime.is_none()
    }

    fn fits_event(&self) -> bool {
        !self.has_transport_fields() && !self.has_lodging_fields()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportLeg {
    pub title: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub flight_status: Option<String>,
    pub flight_gate: Option<String>,
    pub seat: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LodgingStay {
    pub title: Option<String>,
    pub address: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub payment_status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventEntry {
    pub title: Option<String>,
    pub address: Option<String>,
    pub event_datetime: Option<String>,
    pub notes: Option<String>,
}

/// One leg of a trip.
///
/// Records tagged `transport`, `lodging` or `event` that only carry their
/// variant's fields decode into the typed variants. Anything else, including
/// untagged records and records mixing fields of several kinds, is kept as
/// [`ItineraryElement::Generic`] so nothing is lost on the way back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ElementFields", into = "ElementFields")]
pub enum ItineraryElement {
    Transport(TransportLeg),
    Lodging(LodgingStay),
    Event(EventEntry),
    Generic(ElementFields),
}

impl ItineraryElement {
    pub fn title(&self) -> Option<&str> {
        match self {
            ItineraryElement::Transport(leg) => leg.title.as_deref(),
            ItineraryElement::Lodging(stay) => stay.title.as_deref(),
            ItineraryElement::Event(event) => event.title.as_deref(),
            ItineraryElement::Generic(fields) => fields.title.as_deref(),
        }
    }

    /// First non-empty anchor among departure, check-in and event time,
    /// or `""` when the element has none.
    pub fn sort_key(&self) -> &str {
        match self {
            ItineraryElement::Transport(leg) => non_empty(&leg.departure),
            ItineraryElement::Lodging(stay) => non_empty(&stay.check_in),
            ItineraryElement::Event(event) => non_empty(&event.event_datetime),
            ItineraryElement::Generic(fields) => [
                &fields.departure,
                &fields.check_in,
                &fields.event_datetime,
            ]
            .into_iter()
            .map(non_empty)
            .find(|key| !key.is_empty())
            .unwrap_or(""),
        }
    }
}

fn non_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Stable ascending sort by [`ItineraryElement::sort_key`]. Keys compare as
/// plain strings; elements without a key go after every keyed element and
/// keep their relative order.
pub fn sort_itinerary(items: &mut [ItineraryElement]) {
    items.sort_by(|a, b| {
        let (left, right) = (a.sort_key(), b.sort_key());
        left.is_empty()
            .cmp(&right.is_empty())
            .then_with(|| left.cmp(right))
    });
}

impl From<ElementFields> for ItineraryElement {
    fn from(fields: ElementFields) -> Self {
        match fields.kind.as_deref() {
            Some(TRANSPORT) if fields.fits_transport() => ItineraryElement::Transport(TransportLeg {
                title: fields.title,
                from: fields.from,
                to: fields.to,
                departure: fields.departure,
                arrival: fields.arrival,
                flight_status: fields.flight_status,
                flight_gate: fields.flight_gate,
                seat: fields.seat,
                notes: fields.notes,
            }),
            Some(LODGING) if fields.fits_lodging() => ItineraryElement::Lodging(LodgingStay {
                title: fields.title,
                address: fields.address,
                check_in: fields.check_in,
                check_out: fields.check_out,
                payment_status: fields.payment_status,
                notes: fields.notes,
            }),
            Some(EVENT) if fields.fits_event() => ItineraryElement::Event(EventEntry {
                title: fields.title,
                address: fields.address,
                event_datetime: fields.event_datetime,
                notes: fields.notes,
            }),
            _ => ItineraryElement::Generic(fields),
        }
    }
}

impl From<ItineraryElement> for ElementFields {
    fn from(element: ItineraryElement) -> Self {
        match element {
            ItineraryElement::Transport(leg) => ElementFields {
                title: leg.title,
                kind: Some(TRANSPORT.to_string()),
                from: leg.from,
                to: leg.to,
                departure: leg.departure,
                arrival: leg.arrival,
                flight_status: leg.flight_status,
                flight_gate: leg.flight_gate,
                seat: leg.seat,
                notes: leg.notes,
                ..ElementFields::default()
            },
            ItineraryElement::Lodging(stay) => ElementFields {
                title: stay.title,
                kind: Some(LODGING.to_string()),
                address: stay.address,
                check_in: stay.check_in,
                check_out: stay.check_out,
                payment_status: stay.payment_status,
                notes: stay.notes,
                ..ElementFields::default()
            },
            ItineraryElement::Event(event) => ElementFields {
                title: event.title,
                kind: Some(EVENT.to_string()),
                address: event.address,
                event_datetime: event.event_datetime,
                notes: event.notes,
                ..ElementFields::default()
            },
            ItineraryElement::Generic(fields) => fields,
        }
    }
}
