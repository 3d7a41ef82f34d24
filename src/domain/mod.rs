//! Records of the food brand's dashboard.

mod announcement;
mod blog;
mod branch;
mod menu;
mod message;
mod site;
mod social;

pub use announcement::{live_announcements, Announcement, AnnouncementDraft};
pub use blog::{BlogPost, BlogPostDraft};
pub use branch::{ShopBranch, ShopBranchDraft};
pub use menu::{MenuItem, MenuItemDraft, MenuItemPatch};
pub use message::{ContactMessage, ContactMessageDraft, ReadFlag};
pub use site::{ContactInfo, ContactInfoPatch, DashboardStats, DashboardStatsPatch};
pub use social::{SocialLink, SocialLinkDraft};
