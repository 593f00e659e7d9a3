use std::collections::HashMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute_convert::{convert_type, convert_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeDomain {
    Vertex,
    Edge,
    Face,
    FaceCorner,
}

impl AttributeDomain {
    pub const ALL: [AttributeDomain; 4] = [
        AttributeDomain::Vertex,
        AttributeDomain::Edge,
        AttributeDomain::Face,
        AttributeDomain::FaceCorner,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Boolean,
    Integer,
    Float,
    ClampedFloat,
    Vector2,
    Vector3,
}

impl AttributeType {
    pub const ALL: [AttributeType; 6] = [
        AttributeType::Boolean,
        AttributeType::Integer,
        AttributeType::Float,
        AttributeType::ClampedFloat,
        AttributeType::Vector2,
        AttributeType::Vector3,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("index {index} is out of range for an attribute of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("attribute has {actual} elements but its domain has {expected}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("expected a {expected:?} attribute, got {actual:?}")]
    InvalidType {
        expected: AttributeType,
        actual: AttributeType,
    },
    #[error("cannot remap a {0:?} attribute onto its own domain")]
    SameDomain(AttributeDomain),
}

/// A single attribute element, tagged with its value-kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Boolean(bool),
    Integer(i32),
    Float(f32),
    ClampedFloat(f32),
    Vector2(Vec2),
    Vector3(Vec3),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeType {
        match self {
            AttributeValue::Boolean(_) => AttributeType::Boolean,
            AttributeValue::Integer(_) => AttributeType::Integer,
            AttributeValue::Float(_) => AttributeType::Float,
            AttributeValue::ClampedFloat(_) => AttributeType::ClampedFloat,
            AttributeValue::Vector2(_) => AttributeType::Vector2,
            AttributeValue::Vector3(_) => AttributeType::Vector3,
        }
    }

    pub fn default_for(kind: AttributeType) -> Self {
        match kind {
            AttributeType::Boolean => AttributeValue::Boolean(false),
            AttributeType::Integer => AttributeValue::Integer(0),
            AttributeType::Float => AttributeValue::Float(0.0),
            AttributeType::ClampedFloat => AttributeValue::ClampedFloat(0.0),
            AttributeType::Vector2 => AttributeValue::Vector2(Vec2::ZERO),
            AttributeType::Vector3 => AttributeValue::Vector3(Vec3::ZERO),
        }
    }

    pub fn convert(self, kind: AttributeType) -> Self {
        convert_value(self, kind)
    }
}

/// Plain element types that can be read from or written into any attribute.
///
/// Reads and writes go through the value-kind coercion table, so a `f32` view
/// of a vector attribute yields the x components and writing `f32` values into
/// a clamped attribute clamps them.
pub trait AttributeElement: Copy + Default + Send + Sync + 'static {
    const KIND: AttributeType;

    fn from_value(value: AttributeValue) -> Self;

    fn into_value(self) -> AttributeValue;
}

impl AttributeElement for bool {
    const KIND: AttributeType = AttributeType::Boolean;

    fn from_value(value: AttributeValue) -> Self {
        match value.convert(Self::KIND) {
            AttributeValue::Boolean(v) => v,
            _ => Self::default(),
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Boolean(self)
    }
}

impl AttributeElement for i32 {
    const KIND: AttributeType = AttributeType::Integer;

    fn from_value(value: AttributeValue) -> Self {
        match value.convert(Self::KIND) {
            AttributeValue::Integer(v) => v,
            _ => Self::default(),
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Integer(self)
    }
}

impl AttributeElement for f32 {
    const KIND: AttributeType = AttributeType::Float;

    fn from_value(value: AttributeValue) -> Self {
        match value.convert(Self::KIND) {
            AttributeValue::Float(v) => v,
            _ => Self::default(),
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Float(self)
    }
}

impl AttributeElement for Vec2 {
    const KIND: AttributeType = AttributeType::Vector2;

    fn from_value(value: AttributeValue) -> Self {
        match value.convert(Self::KIND) {
            AttributeValue::Vector2(v) => v,
            _ => Self::default(),
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Vector2(self)
    }
}

impl AttributeElement for Vec3 {
    const KIND: AttributeType = AttributeType::Vector3;

    fn from_value(value: AttributeValue) -> Self {
        match value.convert(Self::KIND) {
            AttributeValue::Vector3(v) => v,
            _ => Self::default(),
        }
    }

    fn into_value(self) -> AttributeValue {
        AttributeValue::Vector3(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeStorage {
    Boolean(Vec<bool>),
    Integer(Vec<i32>),
    Float(Vec<f32>),
    ClampedFloat(Vec<f32>),
    Vector2(Vec<Vec2>),
    Vector3(Vec<Vec3>),
}

impl AttributeStorage {
    pub fn new(kind: AttributeType) -> Self {
        Self::with_len(kind, 0)
    }

    pub fn with_len(kind: AttributeType, len: usize) -> Self {
        match kind {
            AttributeType::Boolean => AttributeStorage::Boolean(vec![false; len]),
            AttributeType::Integer => AttributeStorage::Integer(vec![0; len]),
            AttributeType::Float => AttributeStorage::Float(vec![0.0; len]),
            AttributeType::ClampedFloat => AttributeStorage::ClampedFloat(vec![0.0; len]),
            AttributeType::Vector2 => AttributeStorage::Vector2(vec![Vec2::ZERO; len]),
            AttributeType::Vector3 => AttributeStorage::Vector3(vec![Vec3::ZERO; len]),
        }
    }

    /// Collects values into storage of `kind`, coercing every element.
    pub fn from_values<I>(kind: AttributeType, values: I) -> Self
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        let values = values.into_iter();
        match kind {
            AttributeType::Boolean => {
                AttributeStorage::Boolean(values.map(bool::from_value).collect())
            }
            AttributeType::Integer => {
                AttributeStorage::Integer(values.map(i32::from_value).collect())
            }
            AttributeType::Float => AttributeStorage::Float(values.map(f32::from_value).collect()),
            AttributeType::ClampedFloat => AttributeStorage::ClampedFloat(
                values
                    .map(|value| match value.convert(AttributeType::ClampedFloat) {
                        AttributeValue::ClampedFloat(v) => v,
                        _ => 0.0,
                    })
                    .collect(),
            ),
            AttributeType::Vector2 => {
                AttributeStorage::Vector2(values.map(Vec2::from_value).collect())
            }
            AttributeType::Vector3 => {
                AttributeStorage::Vector3(values.map(Vec3::from_value).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AttributeStorage::Boolean(values) => values.len(),
            AttributeStorage::Integer(values) => values.len(),
            AttributeStorage::Float(values) => values.len(),
            AttributeStorage::ClampedFloat(values) => values.len(),
            AttributeStorage::Vector2(values) => values.len(),
            AttributeStorage::Vector3(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> AttributeType {
        match self {
            AttributeStorage::Boolean(_) => AttributeType::Boolean,
            AttributeStorage::Integer(_) => AttributeType::Integer,
            AttributeStorage::Float(_) => AttributeType::Float,
            AttributeStorage::ClampedFloat(_) => AttributeType::ClampedFloat,
            AttributeStorage::Vector2(_) => AttributeType::Vector2,
            AttributeStorage::Vector3(_) => AttributeType::Vector3,
        }
    }

    pub fn get(&self, index: usize) -> Option<AttributeValue> {
        match self {
            AttributeStorage::Boolean(values) => values.get(index).map(|v| AttributeValue::Boolean(*v)),
            AttributeStorage::Integer(values) => values.get(index).map(|v| AttributeValue::Integer(*v)),
            AttributeStorage::Float(values) => values.get(index).map(|v| AttributeValue::Float(*v)),
            AttributeStorage::ClampedFloat(values) => {
                values.get(index).map(|v| AttributeValue::ClampedFloat(*v))
            }
            AttributeStorage::Vector2(values) => values.get(index).map(|v| AttributeValue::Vector2(*v)),
            AttributeStorage::Vector3(values) => values.get(index).map(|v| AttributeValue::Vector3(*v)),
        }
    }

    /// Writes `value` at `index` after coercing it to this storage's kind.
    /// Returns false when the index is out of range.
    pub fn set(&mut self, index: usize, value: AttributeValue) -> bool {
        let kind = self.data_type();
        match (self, value.convert(kind)) {
            (AttributeStorage::Boolean(values), AttributeValue::Boolean(v)) => put(values, index, v),
            (AttributeStorage::Integer(values), AttributeValue::Integer(v)) => put(values, index, v),
            (AttributeStorage::Float(values), AttributeValue::Float(v)) => put(values, index, v),
            (AttributeStorage::ClampedFloat(values), AttributeValue::ClampedFloat(v)) => {
                put(values, index, v)
            }
            (AttributeStorage::Vector2(values), AttributeValue::Vector2(v)) => put(values, index, v),
            (AttributeStorage::Vector3(values), AttributeValue::Vector3(v)) => put(values, index, v),
            _ => false,
        }
    }

    /// Grows or shrinks to `len`, padding with the kind default.
    pub fn resize(&mut self, len: usize) {
        match self {
            AttributeStorage::Boolean(values) => values.resize(len, false),
            AttributeStorage::Integer(values) => values.resize(len, 0),
            AttributeStorage::Float(values) => values.resize(len, 0.0),
            AttributeStorage::ClampedFloat(values) => values.resize(len, 0.0),
            AttributeStorage::Vector2(values) => values.resize(len, Vec2::ZERO),
            AttributeStorage::Vector3(values) => values.resize(len, Vec3::ZERO),
        }
    }

    /// Appends `other`, coercing its elements when the kinds differ.
    pub fn extend_from(&mut self, other: &AttributeStorage) {
        let converted;
        let other = if other.data_type() == self.data_type() {
            other
        } else {
            converted = AttributeStorage::from_values(
                self.data_type(),
                (0..other.len()).filter_map(|i| other.get(i)),
            );
            &converted
        };
        match (self, other) {
            (AttributeStorage::Boolean(a), AttributeStorage::Boolean(b)) => a.extend_from_slice(b),
            (AttributeStorage::Integer(a), AttributeStorage::Integer(b)) => a.extend_from_slice(b),
            (AttributeStorage::Float(a), AttributeStorage::Float(b)) => a.extend_from_slice(b),
            (AttributeStorage::ClampedFloat(a), AttributeStorage::ClampedFloat(b)) => {
                a.extend_from_slice(b)
            }
            (AttributeStorage::Vector2(a), AttributeStorage::Vector2(b)) => a.extend_from_slice(b),
            (AttributeStorage::Vector3(a), AttributeStorage::Vector3(b)) => a.extend_from_slice(b),
            _ => {}
        }
    }
}

fn put<T>(values: &mut [T], index: usize, value: T) -> bool {
    match values.get_mut(index) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// A named, domain-tagged, homogeneous sequence of per-element values.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    domain: AttributeDomain,
    storage: AttributeStorage,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeType, domain: AttributeDomain) -> Self {
        Self::from_storage(name, domain, AttributeStorage::new(kind))
    }

    pub fn with_len(
        name: impl Into<String>,
        kind: AttributeType,
        domain: AttributeDomain,
        len: usize,
    ) -> Self {
        Self::from_storage(name, domain, AttributeStorage::with_len(kind, len))
    }

    pub fn from_storage(
        name: impl Into<String>,
        domain: AttributeDomain,
        storage: AttributeStorage,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            storage,
        }
    }

    /// Builds an attribute whose kind is inferred from the element type.
    pub fn from_values<T, I>(name: impl Into<String>, domain: AttributeDomain, values: I) -> Self
    where
        T: AttributeElement,
        I: IntoIterator<Item = T>,
    {
        let storage =
            AttributeStorage::from_values(T::KIND, values.into_iter().map(T::into_value));
        Self::from_storage(name, domain, storage)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn domain(&self) -> AttributeDomain {
        self.domain
    }

    pub(crate) fn set_domain(&mut self, domain: AttributeDomain) {
        self.domain = domain;
    }

    pub fn kind(&self) -> AttributeType {
        self.storage.data_type()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn storage(&self) -> &AttributeStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut AttributeStorage {
        &mut self.storage
    }

    /// Replaces the contents, coercing each value to this attribute's kind.
    pub fn fill<T, I>(&mut self, values: I)
    where
        T: AttributeElement,
        I: IntoIterator<Item = T>,
    {
        self.fill_values(values.into_iter().map(T::into_value));
    }

    pub fn fill_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        self.storage = AttributeStorage::from_values(self.kind(), values);
    }

    pub fn get(&self, index: usize) -> Result<AttributeValue, AttributeError> {
        self.storage
            .get(index)
            .ok_or(AttributeError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn value<T: AttributeElement>(&self, index: usize) -> Result<T, AttributeError> {
        self.get(index).map(T::from_value)
    }

    pub fn set(&mut self, index: usize, value: impl Into<AttributeValue>) -> Result<(), AttributeError> {
        let len = self.len();
        if self.storage.set(index, value.into()) {
            Ok(())
        } else {
            Err(AttributeError::IndexOutOfRange { index, len })
        }
    }

    /// Coerced view over every element.
    pub fn values<T: AttributeElement>(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |index| self.element(index))
    }

    /// Lazily maps every element through `f`; the attribute is left untouched.
    pub fn yield_values<'a, T, U, F>(&'a self, mut f: F) -> impl Iterator<Item = U> + 'a
    where
        T: AttributeElement,
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        self.values::<T>().map(move |value| f(value))
    }

    /// Zips this attribute with `other` index-wise. The shorter side, or a
    /// missing companion, contributes the kind default.
    pub fn yield_with<'a, T, U, R, F>(
        &'a self,
        other: Option<&'a Attribute>,
        mut f: F,
    ) -> impl Iterator<Item = R> + 'a
    where
        T: AttributeElement,
        U: AttributeElement,
        R: 'a,
        F: FnMut(T, U) -> R + 'a,
    {
        let len = self.len().max(other.map_or(0, Attribute::len));
        (0..len).map(move |index| f(self.element(index), element_or_default(other, index)))
    }

    pub fn yield_with2<'a, T, U, V, R, F>(
        &'a self,
        first: Option<&'a Attribute>,
        second: Option<&'a Attribute>,
        mut f: F,
    ) -> impl Iterator<Item = R> + 'a
    where
        T: AttributeElement,
        U: AttributeElement,
        V: AttributeElement,
        R: 'a,
        F: FnMut(T, U, V) -> R + 'a,
    {
        let len = self
            .len()
            .max(first.map_or(0, Attribute::len))
            .max(second.map_or(0, Attribute::len));
        (0..len).map(move |index| {
            f(
                self.element(index),
                element_or_default(first, index),
                element_or_default(second, index),
            )
        })
    }

    /// Copy of this attribute coerced to `kind`.
    pub fn to_kind(&self, kind: AttributeType) -> Attribute {
        convert_type(self, kind)
    }

    fn element<T: AttributeElement>(&self, index: usize) -> T {
        self.storage.get(index).map(T::from_value).unwrap_or_default()
    }
}

fn element_or_default<T: AttributeElement>(attribute: Option<&Attribute>, index: usize) -> T {
    attribute
        .and_then(|attribute| attribute.storage.get(index))
        .map(T::from_value)
        .unwrap_or_default()
}

/// Terminal step of a `yield_*` chain: writes the produced values into an
/// existing attribute or a fresh one.
pub trait IntoAttribute<T: AttributeElement>: Iterator<Item = T> + Sized {
    fn into_attribute(self, target: &mut Attribute) {
        target.fill(self);
    }

    fn into_new(self, name: impl Into<String>, domain: AttributeDomain) -> Attribute {
        Attribute::from_values(name, domain, self)
    }
}

impl<I, T> IntoAttribute<T> for I
where
    I: Iterator<Item = T>,
    T: AttributeElement,
{
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryAttributes {
    vertex: HashMap<String, Attribute>,
    edge: HashMap<String, Attribute>,
    face: HashMap<String, Attribute>,
    face_corner: HashMap<String, Attribute>,
}

impl GeometryAttributes {
    pub fn map(&self, domain: AttributeDomain) -> &HashMap<String, Attribute> {
        match domain {
            AttributeDomain::Vertex => &self.vertex,
            AttributeDomain::Edge => &self.edge,
            AttributeDomain::Face => &self.face,
            AttributeDomain::FaceCorner => &self.face_corner,
        }
    }

    pub fn map_mut(&mut self, domain: AttributeDomain) -> &mut HashMap<String, Attribute> {
        match domain {
            AttributeDomain::Vertex => &mut self.vertex,
            AttributeDomain::Edge => &mut self.edge,
            AttributeDomain::Face => &mut self.face,
            AttributeDomain::FaceCorner => &mut self.face_corner,
        }
    }

    pub fn get(&self, domain: AttributeDomain, name: &str) -> Option<&Attribute> {
        self.map(domain).get(name)
    }

    pub fn get_mut(&mut self, domain: AttributeDomain, name: &str) -> Option<&mut Attribute> {
        self.map_mut(domain).get_mut(name)
    }

    /// Inserts by name into the attribute's own domain; returns true when an
    /// existing attribute was replaced.
    pub fn insert(&mut self, attribute: Attribute) -> bool {
        self.map_mut(attribute.domain())
            .insert(attribute.name().to_string(), attribute)
            .is_some()
    }

    pub fn remove(&mut self, domain: AttributeDomain, name: &str) -> Option<Attribute> {
        self.map_mut(domain).remove(name)
    }

    pub fn find(&self, name: &str) -> Option<&Attribute> {
        AttributeDomain::ALL
            .iter()
            .find_map(|domain| self.get(*domain, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        AttributeDomain::ALL
            .into_iter()
            .flat_map(move |domain| self.map(domain).values())
    }

    pub fn names(&self, domain: AttributeDomain) -> Vec<String> {
        let mut names: Vec<String> = self.map(domain).keys().cloned().collect();
        names.sort();
        names
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<Vec2> for AttributeValue {
    fn from(value: Vec2) -> Self {
        AttributeValue::Vector2(value)
    }
}

impl From<Vec3> for AttributeValue {
    fn from(value: Vec3) -> Self {
        AttributeValue::Vector3(value)
    }
}
