use std::sync::Arc;

use crate::geocode::ReverseGeocoder;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
}
