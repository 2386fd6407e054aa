use record_gateway_core::contract::UserRecord;

pub trait RecordStore {
    fn put_record(&self, record: &UserRecord) -> Result<(), String>;
    fn scan_all(&self) -> Result<Vec<UserRecord>, String>;
    fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>, String>;
    fn scan_by_min_age(&self, min_age: u32) -> Result<Vec<UserRecord>, String>;
}
