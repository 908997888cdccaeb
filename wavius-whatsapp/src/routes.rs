//! Static routing table for Wavius endpoints.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use http::Method;
use percent_encoding::utf8_percent_encode;
use wavius_http::PATH_SEGMENT;

use crate::{Result, ServiceError};

/// Verb and path template of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    /// Path relative to the API root, with `{param}` placeholders.
    pub template: &'static str,
}

impl Route {
    /// Placeholder names in template order.
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.template
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
    }

    /// Fill the template, encoding each value as a single path segment.
    pub fn render(&self, params: &BTreeMap<String, String>) -> Result<String> {
        if let Some(unknown) = params.keys().find(|k| !self.params().any(|p| p == k.as_str())) {
            return Err(ServiceError::UnknownParam {
                endpoint: self.name,
                param: unknown.clone(),
            });
        }

        let mut path = String::with_capacity(self.template.len());
        for segment in self.template.split('/').skip(1) {
            path.push('/');
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => {
                    let value = params
                        .get(param)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| ServiceError::MissingParam {
                            endpoint: self.name,
                            param: param.to_string(),
                        })?;
                    path.extend(utf8_percent_encode(value, PATH_SEGMENT));
                }
                None => path.push_str(segment),
            }
        }

        Ok(path)
    }
}

macro_rules! endpoints {
    ($($variant:ident => $name:literal, $method:ident, $template:literal;)*) => {
        /// A Wavius API operation.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Endpoint {
            $($variant,)*
        }

        impl Endpoint {
            /// Every endpoint, in table order.
            pub const ALL: &'static [Endpoint] = &[$(Endpoint::$variant,)*];

            /// Snake-case operation name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Endpoint::$variant => $name,)*
                }
            }

            /// Verb and path template.
            pub fn route(self) -> Route {
                match self {
                    $(Endpoint::$variant => Route {
                        name: $name,
                        method: Method::$method,
                        template: $template,
                    },)*
                }
            }
        }
    };
}

endpoints! {
    // Messages
    SendMessage => "send_message", POST, "/messages/chat";
    SendImage => "send_image", POST, "/messages/image";
    SendDocument => "send_document", POST, "/messages/document";
    SendAudio => "send_audio", POST, "/messages/audio";
    SendVideo => "send_video", POST, "/messages/video";
    SendLocation => "send_location", POST, "/messages/location";
    SendContact => "send_contact", POST, "/messages/contact";
    GetMessages => "get_messages", GET, "/messages";
    DeleteMessage => "delete_message", DELETE, "/messages/delete";
    ResendMessage => "resend_message", POST, "/messages/resend-by-id";
    ResendMessagesByStatus => "resend_messages_by_status", POST, "/messages/resend-by-status";

    // Chats
    GetChats => "get_chats", GET, "/chats";
    ArchiveChat => "archive_chat", POST, "/chats/{chat_id}/archive";
    UnarchiveChat => "unarchive_chat", POST, "/chats/{chat_id}/unarchive";
    PinChat => "pin_chat", POST, "/chats/{chat_id}/pin";
    UnpinChat => "unpin_chat", POST, "/chats/{chat_id}/unpin";
    DeleteChat => "delete_chat", DELETE, "/chats/{chat_id}";

    // Contacts
    GetContacts => "get_contacts", GET, "/contacts";
    UpdateContact => "update_contact", PUT, "/contacts/{contact_id}";
    DeleteContact => "delete_contact", DELETE, "/contacts/{contact_id}";

    // Groups
    GetGroups => "get_groups", GET, "/groups";
    CreateGroup => "create_group", POST, "/groups";
    UpdateGroup => "update_group", PUT, "/groups/{group_id}";
    DeleteGroup => "delete_group", DELETE, "/groups/{group_id}";
    AddParticipants => "add_participants", POST, "/groups/{group_id}/participants";
    RemoveParticipants => "remove_participants", DELETE, "/groups/{group_id}/participants";
    PromoteAdmins => "promote_admins", POST, "/groups/{group_id}/admins";
    DemoteAdmins => "demote_admins", DELETE, "/groups/{group_id}/admins";

    // Instance
    GetInstanceStatus => "get_instance_status", GET, "/status";
    ConnectInstance => "connect_instance", POST, "/connect";
    DisconnectInstance => "disconnect_instance", DELETE, "/disconnect";
    GetQrCode => "get_qr_code", GET, "/qr";

    // Business
    GetBusinessProfile => "get_business_profile", GET, "/business/profile";
    UpdateBusinessProfile => "update_business_profile", PUT, "/business/profile";
    GetBusinessCatalog => "get_business_catalog", GET, "/business/catalog";
    CreateBusinessCatalog => "create_business_catalog", POST, "/business/catalog";
    GetProduct => "get_product", GET, "/business/catalog/{product_id}";
    UpdateProduct => "update_product", PUT, "/business/catalog/{product_id}";
    DeleteProduct => "delete_product", DELETE, "/business/catalog/{product_id}";

    // Analytics
    GetAnalytics => "get_analytics", GET, "/analytics/{type}";
    GetReports => "get_reports", GET, "/reports/{type}";

    // Queue
    GetQueueStats => "get_queue_stats", GET, "/queue/stats";
    GetJob => "get_job", GET, "/queue/jobs/{job_id}";
    CancelJob => "cancel_job", DELETE, "/queue/jobs/{job_id}";

    // Webhooks
    GetWebhooks => "get_webhooks", GET, "/webhooks";
    CreateWebhook => "create_webhook", POST, "/webhooks";
    UpdateWebhook => "update_webhook", PUT, "/webhooks/{webhook_id}";
    DeleteWebhook => "delete_webhook", DELETE, "/webhooks/{webhook_id}";

    // Media
    UploadMedia => "upload_media", POST, "/media/upload";
    GetMedia => "get_media", GET, "/media/{media_id}";
    DeleteMedia => "delete_media", DELETE, "/media/{media_id}";
}

impl Endpoint {
    /// Whether the endpoint takes a multipart file upload.
    pub fn is_upload(self) -> bool {
        self == Endpoint::UploadMedia
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| ServiceError::UnknownEndpoint(s.to_string()))
    }
}
