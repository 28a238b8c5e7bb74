// ABOUTME: Customer directory backed by the record store
// ABOUTME: Local copies change only after the store acknowledges a write

use chrono::Utc;
use crm_core::{
    collections, filter_records, validate_customer_input, Customer, CustomerCreateInput,
    CustomerStatus, CustomerUpdateInput, ValidationError,
};
use crm_storage::{encode, user_documents, RecordStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::{DirectoryError, DirectoryResult};

/// Status restriction applied on top of a text search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CustomerStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: CustomerStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    user_id: Option<String>,
    customers: Vec<Customer>,
}

/// A user's customers, kept in load order
#[derive(Clone)]
pub struct CustomerDirectory {
    store: Arc<dyn RecordStore>,
    state: Arc<RwLock<DirectoryState>>,
}

impl CustomerDirectory {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(DirectoryState::default())),
        }
    }

    pub async fn load(&self, user_id: &str) -> DirectoryResult<Vec<Customer>> {
        let loaded = user_documents::<Customer>(self.store.as_ref(), collections::CUSTOMERS, user_id)
            .await
            .map_err(|e| {
                error!("Error fetching customers for user {}: {}", user_id, e);
                DirectoryError::Load(e)
            });

        let mut state = self.state.write().await;
        state.user_id = Some(user_id.to_string());
        match loaded {
            Ok(loaded) => {
                state.customers = loaded.records.clone();
                info!("Loaded {} customers for user {}", loaded.records.len(), user_id);
                Ok(loaded.records)
            }
            Err(e) => {
                state.customers.clear();
                Err(e)
            }
        }
    }

    pub async fn create(&self, input: CustomerCreateInput) -> DirectoryResult<Customer> {
        let user_id = self.session().await?;

        let errors = validate_customer_input(&input);
        if !errors.is_empty() {
            return Err(DirectoryError::Invalid(errors));
        }

        let customer = Customer {
            id: String::new(),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            company: input.company,
            status: input.status.unwrap_or_default(),
            user_id,
            created_at: None,
            updated_at: None,
        };

        let document = self
            .store
            .create(collections::CUSTOMERS, encode(&customer)?)
            .await
            .map_err(|e| {
                error!("Error adding customer: {}", e);
                DirectoryError::Remote(e)
            })?;
        let created: Customer = document.decode()?;

        self.state.write().await.customers.push(created.clone());
        info!("Created customer '{}' with ID {}", created.name, created.id);
        Ok(created)
    }

    /// Apply a partial update. The local copy is replaced once the store accepts it.
    pub async fn update(&self, id: &str, input: CustomerUpdateInput) -> DirectoryResult<Customer> {
        if input.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(DirectoryError::Invalid(vec![ValidationError::new(
                "name",
                "Customer name is required",
            )]));
        }
        self.require(id).await?;

        self.store
            .update(collections::CUSTOMERS, id, encode(&input)?)
            .await
            .map_err(|e| {
                error!("Error updating customer {}: {}", id, e);
                DirectoryError::Remote(e)
            })?;

        let mut state = self.state.write().await;
        let customer = state
            .customers
            .iter_mut()
            .find(|customer| customer.id == id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;

        if let Some(name) = input.name {
            customer.name = name;
        }
        if let Some(email) = input.email {
            customer.email = Some(email);
        }
        if let Some(phone) = input.phone {
            customer.phone = Some(phone);
        }
        if let Some(company) = input.company {
            customer.company = Some(company);
        }
        if let Some(status) = input.status {
            customer.status = status;
        }
        customer.updated_at = Some(Utc::now());

        info!("Updated customer {}", id);
        Ok(customer.clone())
    }

    /// Delete a customer. Deals that reference it are left untouched.
    pub async fn delete(&self, id: &str) -> DirectoryResult<()> {
        self.require(id).await?;

        self.store
            .delete(collections::CUSTOMERS, id)
            .await
            .map_err(|e| {
                error!("Error deleting customer {}: {}", id, e);
                DirectoryError::Remote(e)
            })?;

        self.state
            .write()
            .await
            .customers
            .retain(|customer| customer.id != id);
        info!("Deleted customer {}", id);
        Ok(())
    }

    /// Customers matching a free-text query and a status filter
    pub async fn filtered(&self, query: &str, status: StatusFilter) -> Vec<Customer> {
        let state = self.state.read().await;
        filter_records(&state.customers, query)
            .into_iter()
            .filter(|customer| status.matches(customer.status))
            .cloned()
            .collect()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.state.read().await.customers.clone()
    }

    pub async fn customer(&self, id: &str) -> Option<Customer> {
        self.state
            .read()
            .await
            .customers
            .iter()
            .find(|customer| customer.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.customers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn session(&self) -> DirectoryResult<String> {
        match self.state.read().await.user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => Ok(user_id.to_string()),
            _ => Err(DirectoryError::NoSession),
        }
    }

    async fn require(&self, id: &str) -> DirectoryResult<()> {
        if self.customer(id).await.is_none() {
            warn!("Could not find customer with ID {}", id);
            return Err(DirectoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
