/// Encoded packet as read from an input. The payload is owned here until
/// the packet is handed to a muxer.
pub struct RawPacket {
    packet: ffmpeg_next::codec::packet::Packet,
}

impl RawPacket {
    pub fn pts(&self) -> Option<i64> {
        self.packet.pts()
    }

    pub fn dts(&self) -> Option<i64> {
        self.packet.dts()
    }

    pub fn duration(&self) -> i64 {
        self.packet.duration()
    }

    pub fn size(&self) -> usize {
        self.packet.size()
    }

    pub fn index(&self) -> usize {
        self.packet.stream()
    }

    pub fn set_pts(&mut self, pts: Option<i64>) {
        self.packet.set_pts(pts);
    }

    pub fn set_dts(&mut self, dts: Option<i64>) {
        self.packet.set_dts(dts);
    }

    pub fn set_duration(&mut self, duration: i64) {
        self.packet.set_duration(duration);
    }

    /// Byte offset in the source container; -1 means unknown.
    pub fn set_position(&mut self, position: isize) {
        self.packet.set_position(position);
    }

    /// Get a reference to the inner packet for muxer calls.
    pub fn packet(&self) -> &ffmpeg_next::codec::packet::Packet {
        &self.packet
    }
}

impl From<ffmpeg_next::codec::packet::Packet> for RawPacket {
    fn from(packet: ffmpeg_next::codec::packet::Packet) -> Self {
        Self { packet }
    }
}
